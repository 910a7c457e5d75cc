//! Credential store trait.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::{NewUser, UserRecord};

/// Stores users keyed by email.
///
/// Email comparison is case-insensitive on both paths: a second account whose
/// email differs only in case is rejected on insert, and lookups ignore case.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user.
    ///
    /// Returns [`AccountError::EmailTaken`](crate::error::AccountError::EmailTaken)
    /// when the email is already registered. Uniqueness is enforced by the
    /// store itself, so concurrent registrations cannot both succeed.
    async fn create_user(&self, user: NewUser) -> StorageResult<UserRecord>;

    /// Looks up a user by email, ignoring case.
    async fn find_user_by_email(&self, email: &str) -> StorageResult<Option<UserRecord>>;
}

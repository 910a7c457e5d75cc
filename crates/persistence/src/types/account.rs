//! User account types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user to be inserted. The password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Display name.
    pub username: String,
    /// Email address as entered; uniqueness is case-insensitive.
    pub email: String,
    /// Salted password hash (bcrypt).
    pub password_hash: String,
    /// Age, when provided.
    pub age: Option<i32>,
    /// Profession, when provided.
    pub profession: Option<String>,
}

/// A stored user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Surrogate key.
    pub user_id: i64,
    /// Display name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Salted password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Age.
    pub age: Option<i32>,
    /// Profession.
    pub profession: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Normalizes an email for uniqueness comparison.
pub fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_key_is_case_insensitive() {
        assert_eq!(email_key("A@B.com"), email_key("a@b.com"));
        assert_eq!(email_key("  a@b.com "), "a@b.com");
    }
}

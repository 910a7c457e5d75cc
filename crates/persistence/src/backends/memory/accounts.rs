//! In-memory accounts.

use async_trait::async_trait;
use chrono::Utc;

use super::MemoryBackend;
use crate::core::UserStore;
use crate::error::{AccountError, StorageResult};
use crate::types::{NewUser, UserRecord, email_key};

#[async_trait]
impl UserStore for MemoryBackend {
    async fn create_user(&self, user: NewUser) -> StorageResult<UserRecord> {
        let mut accounts = self.accounts.write();

        let key = email_key(&user.email);
        if accounts.users.iter().any(|u| email_key(&u.email) == key) {
            return Err(AccountError::EmailTaken { email: user.email }.into());
        }

        accounts.next_id += 1;
        let record = UserRecord {
            user_id: accounts.next_id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            age: user.age,
            profession: user.profession,
            created_at: Utc::now(),
        };
        accounts.users.push(record.clone());

        Ok(record)
    }

    async fn find_user_by_email(&self, email: &str) -> StorageResult<Option<UserRecord>> {
        let key = email_key(email);
        Ok(self
            .accounts
            .read()
            .users
            .iter()
            .find(|u| email_key(&u.email) == key)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            username: "jane".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            age: Some(34),
            profession: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let backend = MemoryBackend::new();
        let created = backend.create_user(new_user("jane@example.com")).await.unwrap();
        assert_eq!(created.user_id, 1);

        let found = backend
            .find_user_by_email("JANE@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_email_uniqueness_ignores_case() {
        let backend = MemoryBackend::new();
        backend.create_user(new_user("a@b.com")).await.unwrap();

        let err = backend.create_user(new_user("A@B.com")).await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::Account(AccountError::EmailTaken { .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_email() {
        let backend = MemoryBackend::new();
        assert!(backend.find_user_by_email("x@y.z").await.unwrap().is_none());
    }
}

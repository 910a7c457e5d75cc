//! User accounts in PostgreSQL.

use async_trait::async_trait;
use tokio_postgres::Row;
use tokio_postgres::error::SqlState;

use super::PostgresBackend;
use super::backend::pg_error;
use crate::core::UserStore;
use crate::error::{AccountError, BackendError, StorageError, StorageResult};
use crate::types::{NewUser, UserRecord};

const USER_COLUMNS: &str = "user_id, username, email, password_hash, age, profession, created_at";

fn decode_user(row: &Row) -> StorageResult<UserRecord> {
    let decode = |e: tokio_postgres::Error| {
        StorageError::Backend(BackendError::SerializationError {
            message: format!("Failed to decode user row: {}", e),
        })
    };

    Ok(UserRecord {
        user_id: row.try_get("user_id").map_err(decode)?,
        username: row.try_get("username").map_err(decode)?,
        email: row.try_get("email").map_err(decode)?,
        password_hash: row.try_get("password_hash").map_err(decode)?,
        age: row.try_get("age").map_err(decode)?,
        profession: row.try_get("profession").map_err(decode)?,
        created_at: row.try_get("created_at").map_err(decode)?,
    })
}

#[async_trait]
impl UserStore for PostgresBackend {
    async fn create_user(&self, user: NewUser) -> StorageResult<UserRecord> {
        let client = self.get_client().await?;
        let sql = format!(
            "INSERT INTO users (username, email, password_hash, age, profession) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        );

        let result = client
            .query_one(
                sql.as_str(),
                &[
                    &user.username,
                    &user.email,
                    &user.password_hash,
                    &user.age,
                    &user.profession,
                ],
            )
            .await;

        match result {
            Ok(row) => decode_user(&row),
            Err(e) if e.code() == Some(&SqlState::UNIQUE_VIOLATION) => {
                Err(StorageError::Account(AccountError::EmailTaken { email: user.email }))
            }
            Err(e) => Err(pg_error("Failed to insert user", e)),
        }
    }

    async fn find_user_by_email(&self, email: &str) -> StorageResult<Option<UserRecord>> {
        let client = self.get_client().await?;
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)");

        let row = client
            .query_opt(sql.as_str(), &[&email])
            .await
            .map_err(|e| pg_error("Failed to look up user", e))?;

        row.as_ref().map(decode_user).transpose()
    }
}

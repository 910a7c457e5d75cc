//! PostgreSQL schema definitions and migrations.
//!
//! Only the objects the application owns are created here. The catalog
//! tables (`medicaments` and its reference tables) come from the exported
//! table scripts run by the data loader.

use super::backend::pg_error;
use crate::error::{BackendError, StorageError, StorageResult};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema.
pub async fn initialize_schema(client: &deadpool_postgres::Client) -> StorageResult<()> {
    let current_version = get_schema_version(client).await?;

    if current_version < SCHEMA_VERSION {
        create_schema_v1(client).await?;
        set_schema_version(client, SCHEMA_VERSION).await?;
        tracing::info!(version = SCHEMA_VERSION, "Created PostgreSQL schema");
    }

    Ok(())
}

/// Maps a DDL failure to a schema error, unless the connection itself dropped.
fn schema_error(context: &str, error: tokio_postgres::Error) -> StorageError {
    if error.is_closed() {
        return pg_error(context, error);
    }
    StorageError::Backend(BackendError::SchemaError {
        message: format!("{}: {}", context, error),
    })
}

/// Get the current schema version.
async fn get_schema_version(client: &deadpool_postgres::Client) -> StorageResult<i32> {
    client
        .execute(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER NOT NULL
            )",
            &[],
        )
        .await
        .map_err(|e| schema_error("Failed to create schema_version table", e))?;

    let row = client
        .query_opt("SELECT version FROM schema_version LIMIT 1", &[])
        .await
        .map_err(|e| pg_error("Failed to query schema version", e))?;

    Ok(row.map(|r| r.get::<_, i32>(0)).unwrap_or(0))
}

/// Set the schema version.
async fn set_schema_version(client: &deadpool_postgres::Client, version: i32) -> StorageResult<()> {
    client
        .execute("DELETE FROM schema_version", &[])
        .await
        .map_err(|e| pg_error("Failed to clear schema_version", e))?;

    client
        .execute(
            "INSERT INTO schema_version (version) VALUES ($1)",
            &[&version],
        )
        .await
        .map_err(|e| pg_error("Failed to set schema_version", e))?;

    Ok(())
}

/// Create the initial schema (version 1).
async fn create_schema_v1(client: &deadpool_postgres::Client) -> StorageResult<()> {
    // similarity() lives in pg_trgm
    client
        .batch_execute("CREATE EXTENSION IF NOT EXISTS pg_trgm")
        .await
        .map_err(|e| schema_error("Failed to create pg_trgm extension", e))?;

    client
        .batch_execute(
            "CREATE TABLE IF NOT EXISTS users (
                user_id BIGSERIAL PRIMARY KEY,
                username TEXT NOT NULL,
                email TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                age INTEGER,
                profession TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email_lower ON users (LOWER(email));",
        )
        .await
        .map_err(|e| schema_error("Failed to create users table", e))?;

    Ok(())
}

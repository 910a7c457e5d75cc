//! PostgreSQL backend implementation.
//!
//! Serves the catalog search, the option lookups and the user accounts from
//! one deadpool-postgres pool. Free-text matching uses `pg_trgm`'s
//! `similarity()`, so the extension must be available in the database.
//!
//! # Example
//!
//! ```no_run
//! use medisae_persistence::backends::postgres::{PostgresBackend, PostgresConfig};
//! use medisae_persistence::search::{MedicationQuery, search_catalog};
//! use medisae_persistence::types::SearchFilters;
//!
//! # async fn main_example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = PostgresBackend::new(PostgresConfig::default()).await?;
//! backend.init_schema().await?;
//!
//! let query = MedicationQuery::new(SearchFilters::new().with_search("aspirin"));
//! let outcome = search_catalog(&backend, &query).await?;
//! println!("{} matches", outcome.rows.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Schema
//!
//! The backend owns only the account table; the catalog tables are created by
//! the exported table scripts.
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS users (
//!     user_id BIGSERIAL PRIMARY KEY,
//!     username TEXT NOT NULL,
//!     email TEXT NOT NULL,
//!     password_hash TEXT NOT NULL,
//!     age INTEGER,
//!     profession TEXT,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email_lower ON users (LOWER(email));
//! ```

mod accounts;
mod backend;
mod catalog;
mod loader;
pub(crate) mod schema;

pub use backend::{PostgresBackend, PostgresConfig, PostgresSslMode};

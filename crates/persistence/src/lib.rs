//! Medisae Persistence Layer
//!
//! This crate provides storage and search for the Medisae medication browser:
//! a filter-aware catalog search over a relational store, a credential store
//! for user accounts, ingredient metadata from a document store, and a loader
//! that restores the catalog from exported table scripts.
//!
//! # Backend Features
//!
//! Enable backends with feature flags in `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! medisae-persistence = { version = "0.1", features = ["postgres", "mongodb"] }
//! ```
//!
//! Available features:
//! - `postgres` (default) - PostgreSQL catalog and accounts via deadpool-postgres
//! - `mongodb` - MongoDB ingredient documents
//! - `loader` - the `medisae-loader` binary
//!
//! The in-memory backend is always available.
//!
//! # Architecture
//!
//! - [`types`] - Search filters, result rows, accounts and ingredient documents
//! - [`error`] - Error types for all operations
//! - [`core`] - Storage traits
//! - [`search`] - Query construction and option reconciliation
//! - [`backends`] - Backend implementations (in-memory, PostgreSQL, MongoDB)
//! - [`loader`] - Ordered execution of table scripts
//!
//! # Search
//!
//! A search runs the filtered product query, then narrows each dropdown to
//! the values present in the results:
//!
//! ```
//! use medisae_persistence::backends::memory::MemoryBackend;
//! use medisae_persistence::search::{MedicationQuery, search_catalog};
//! use medisae_persistence::types::SearchFilters;
//!
//! # tokio_test::block_on(async {
//! let backend = MemoryBackend::with_sample_data();
//! let query = MedicationQuery::new(SearchFilters::new().with_search("aspirin"));
//!
//! let outcome = search_catalog(&backend, &query).await.unwrap();
//! assert_eq!(outcome.rows.len(), 2);
//! assert_eq!(outcome.options.active_ingredients.len(), 1);
//! # });
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod loader;
pub mod search;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{StorageError, StorageResult};
pub use search::{DEFAULT_SIMILARITY_THRESHOLD, MedicationQuery, SimilarityThreshold, search_catalog};
pub use types::{SearchFilters, SearchOutcome};

// Re-export core traits
pub use core::{CatalogStore, IngredientDocumentStore, ReferenceLookup, UserStore};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

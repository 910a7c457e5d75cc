//! Core storage traits and abstractions.
//!
//! This module provides the foundational traits for the persistence layer:
//!
//! - [`ReferenceLookup`] - Option lists read from the reference tables
//! - [`CatalogStore`] - Medication search over the product table
//! - [`UserStore`] - Credential store for registration and login
//! - [`IngredientDocumentStore`] - Free-form ingredient metadata
//!
//! # Trait Hierarchy
//!
//! ```text
//! ReferenceLookup
//!     └── CatalogStore
//!
//! UserStore
//!
//! IngredientDocumentStore
//! ```
//!
//! Relational backends implement both [`CatalogStore`] and [`UserStore`]; the
//! document store is a separate dependency so it can live in another
//! database.
//!
//! # Example: Implementing a Reference Lookup
//!
//! ```ignore
//! use async_trait::async_trait;
//! use medisae_persistence::core::ReferenceLookup;
//! use medisae_persistence::error::StorageResult;
//! use medisae_persistence::search::OptionRequest;
//! use medisae_persistence::types::FilterOption;
//!
//! struct FixedOptions;
//!
//! #[async_trait]
//! impl ReferenceLookup for FixedOptions {
//!     async fn lookup_options(&self, request: &OptionRequest) -> StorageResult<Vec<FilterOption>> {
//!         Ok(vec![FilterOption::from_value("500 mg")])
//!     }
//! }
//! ```

mod accounts;
mod catalog;
mod documents;

pub use accounts::UserStore;
pub use catalog::{CatalogStore, ReferenceLookup};
pub use documents::{DynDocumentStore, IngredientDocumentStore};

//! Core types for the persistence layer.
//!
//! This module provides the fundamental types used throughout the persistence layer:
//!
//! - [`SearchFilters`], [`RawSearchParams`], [`FilterDimension`] - Search input
//! - [`MedicationRow`], [`FilterOptions`], [`SearchOutcome`] - Search output
//! - [`NewUser`], [`UserRecord`] - Accounts
//! - [`IngredientDocument`] - Ingredient metadata from the document store
//!
//! # Examples
//!
//! ## Parsing Search Filters
//!
//! ```
//! use medisae_persistence::types::{RawSearchParams, SearchFilters};
//!
//! let raw = RawSearchParams {
//!     condition: Some("5".to_string()),
//!     manufacturer: Some(String::new()),
//!     ..Default::default()
//! };
//!
//! let filters = SearchFilters::parse(&raw).unwrap();
//! assert_eq!(filters.condition, Some(5));
//! assert_eq!(filters.manufacturer, None);
//! ```

mod account;
mod catalog;
mod filters;
mod ingredient;

pub use account::{NewUser, UserRecord, email_key};
pub use catalog::{
    FilterOption, FilterOptions, MedicationRow, MedicationSummary, SearchOutcome,
};
pub use filters::{FilterDimension, RawSearchParams, SearchFilters};
pub use ingredient::{
    DocumentSection, IngredientDocument, NAME_FIELD, SectionLayout, TABULAR_SECTIONS,
};

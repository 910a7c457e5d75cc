//! Medication search.
//!
//! A search runs in two phases against a [`CatalogStore`]:
//!
//! 1. The filtered, similarity-ranked product query
//!    ([`MedicationQueryBuilder::build_search_query`]).
//! 2. Option reconciliation: one lookup per filter dimension, restricted to
//!    the values present in the phase-one rows ([`reconcile_options`]).
//!
//! Both phases must succeed; a failure in either yields an error and no
//! partial outcome.

mod query_builder;
mod reconcile;
pub mod trigram;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub use query_builder::{
    BASE_COLUMNS, CATALOG_JOINS, MedicationQueryBuilder, SqlFragment, SqlParam,
};
pub use reconcile::{
    AvailableValues, OptionRequest, Restriction, plan_option_requests, reconcile_options,
};

use crate::core::CatalogStore;
use crate::error::{StorageResult, ValidationError};
use crate::types::{SearchFilters, SearchOutcome};

/// Default minimum trigram similarity a name must exceed to match a term.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.3;

/// Minimum trigram similarity, in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct SimilarityThreshold(f32);

impl SimilarityThreshold {
    /// Creates a threshold, rejecting values outside `(0, 1]`.
    pub fn new(value: f32) -> Result<Self, ValidationError> {
        if value > 0.0 && value <= 1.0 {
            Ok(Self(value))
        } else {
            Err(ValidationError::InvalidField {
                field: "similarity_threshold".to_string(),
                message: format!("must be in (0, 1], got {value}"),
            })
        }
    }

    /// Returns the raw value.
    pub fn value(&self) -> f32 {
        self.0
    }
}

impl Default for SimilarityThreshold {
    fn default() -> Self {
        Self(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

impl TryFrom<f32> for SimilarityThreshold {
    type Error = ValidationError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SimilarityThreshold> for f32 {
    fn from(threshold: SimilarityThreshold) -> Self {
        threshold.0
    }
}

impl fmt::Display for SimilarityThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A search request as seen by a catalog store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MedicationQuery {
    /// Validated filters.
    pub filters: SearchFilters,
    /// Threshold applied to the free-text term.
    pub similarity_threshold: SimilarityThreshold,
}

impl MedicationQuery {
    /// Creates a query with the default threshold.
    pub fn new(filters: SearchFilters) -> Self {
        Self {
            filters,
            similarity_threshold: SimilarityThreshold::default(),
        }
    }

    /// Overrides the similarity threshold.
    pub fn with_threshold(mut self, threshold: SimilarityThreshold) -> Self {
        self.similarity_threshold = threshold;
        self
    }
}

/// Runs both search phases.
#[instrument(skip(store), fields(backend = store.backend_name()))]
pub async fn search_catalog<S>(store: &S, query: &MedicationQuery) -> StorageResult<SearchOutcome>
where
    S: CatalogStore + ?Sized,
{
    let rows = store.find_medications(query).await?;
    debug!(rows = rows.len(), "Search query returned");

    let options = reconcile_options(store, &rows).await?;

    Ok(SearchOutcome { rows, options })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_bounds() {
        assert!(SimilarityThreshold::new(0.0).is_err());
        assert!(SimilarityThreshold::new(-0.1).is_err());
        assert!(SimilarityThreshold::new(1.5).is_err());
        assert!(SimilarityThreshold::new(f32::NAN).is_err());
        assert_eq!(SimilarityThreshold::new(1.0).unwrap().value(), 1.0);
        assert_eq!(
            SimilarityThreshold::default().value(),
            DEFAULT_SIMILARITY_THRESHOLD
        );
    }

    #[test]
    fn test_threshold_deserialize_validates() {
        let ok: SimilarityThreshold = serde_json::from_str("0.5").unwrap();
        assert_eq!(ok.value(), 0.5);
        assert!(serde_json::from_str::<SimilarityThreshold>("2.0").is_err());
    }
}

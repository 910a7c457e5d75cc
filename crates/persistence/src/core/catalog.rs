//! Catalog storage traits.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::search::{MedicationQuery, OptionRequest};
use crate::types::{FilterOption, MedicationRow, MedicationSummary};

/// Reads dropdown options from the reference tables.
///
/// This is the repository seam behind option reconciliation: the
/// reconciliation logic decides *which* values to ask for, implementors only
/// answer the question.
#[async_trait]
pub trait ReferenceLookup: Send + Sync {
    /// Returns the options of `request.dimension`, restricted to the values
    /// in `request.restriction` when it is not unrestricted.
    async fn lookup_options(&self, request: &OptionRequest) -> StorageResult<Vec<FilterOption>>;
}

/// Medication search over the product table and its reference tables.
#[async_trait]
pub trait CatalogStore: ReferenceLookup {
    /// Returns a human-readable name for this backend.
    fn backend_name(&self) -> &'static str;

    /// Runs the phase-one search query.
    ///
    /// Rows are ordered by product name then dosage.
    async fn find_medications(&self, query: &MedicationQuery) -> StorageResult<Vec<MedicationRow>>;

    /// Lists products whose active ingredient has exactly this name.
    async fn medications_by_ingredient(
        &self,
        ingredient_name: &str,
    ) -> StorageResult<Vec<MedicationSummary>>;

    /// Verifies that the store is reachable.
    async fn health_check(&self) -> StorageResult<()>;
}

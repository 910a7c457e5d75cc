//! Result-to-filter-option reconciliation.
//!
//! After the search query runs, every dropdown is narrowed to the values that
//! actually occur in the result rows. A dimension with no value in the rows
//! (including an empty result set) falls back to its full option list.

use std::collections::BTreeSet;

use tracing::debug;

use crate::core::ReferenceLookup;
use crate::error::StorageResult;
use crate::types::{FilterDimension, FilterOptions, MedicationRow};

/// How an option lookup is restricted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restriction {
    /// Return every option of the dimension.
    Unrestricted,
    /// Return only the reference rows with these ids.
    Ids(Vec<i32>),
    /// Return only these literal values.
    Values(Vec<String>),
}

/// One phase-two lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRequest {
    /// The dimension to look up.
    pub dimension: FilterDimension,
    /// The restriction to apply.
    pub restriction: Restriction,
}

/// Distinct non-null values present in a result set, per dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailableValues {
    /// Condition ids.
    pub conditions: BTreeSet<i32>,
    /// Manufacturer ids.
    pub manufacturers: BTreeSet<i32>,
    /// Non-empty dosages.
    pub dosages: BTreeSet<String>,
    /// Pharmaceutic form ids.
    pub forms: BTreeSet<i32>,
    /// Active ingredient ids.
    pub active_ingredients: BTreeSet<i32>,
}

impl AvailableValues {
    /// Collects the values present in `rows`.
    pub fn from_rows(rows: &[MedicationRow]) -> Self {
        let mut values = Self::default();
        for row in rows {
            values.conditions.extend(row.condition_id);
            values.manufacturers.extend(row.manufacturer_id);
            values.forms.extend(row.form_id);
            values.active_ingredients.extend(row.ingredient_id);
            if let Some(dosage) = row.dosage.as_deref().filter(|d| !d.is_empty()) {
                values.dosages.insert(dosage.to_string());
            }
        }
        values
    }

    /// Builds the lookup for one dimension.
    pub fn request_for(&self, dimension: FilterDimension) -> OptionRequest {
        let restriction = match dimension {
            FilterDimension::Condition => ids(&self.conditions),
            FilterDimension::Manufacturer => ids(&self.manufacturers),
            FilterDimension::Form => ids(&self.forms),
            FilterDimension::ActiveIngredient => ids(&self.active_ingredients),
            FilterDimension::Dosage if self.dosages.is_empty() => Restriction::Unrestricted,
            FilterDimension::Dosage => Restriction::Values(self.dosages.iter().cloned().collect()),
        };
        OptionRequest {
            dimension,
            restriction,
        }
    }
}

fn ids(set: &BTreeSet<i32>) -> Restriction {
    if set.is_empty() {
        Restriction::Unrestricted
    } else {
        Restriction::Ids(set.iter().copied().collect())
    }
}

/// Plans the five option lookups for a result set, in display order.
pub fn plan_option_requests(rows: &[MedicationRow]) -> [OptionRequest; 5] {
    let available = AvailableValues::from_rows(rows);
    FilterDimension::ALL.map(|dimension| available.request_for(dimension))
}

/// Runs the planned lookups and assembles the dropdown lists.
///
/// Lookups run one after the other on the caller's connection; the first
/// failure aborts the whole reconciliation.
pub async fn reconcile_options<L>(lookup: &L, rows: &[MedicationRow]) -> StorageResult<FilterOptions>
where
    L: ReferenceLookup + ?Sized,
{
    let mut options = FilterOptions::default();

    for request in plan_option_requests(rows) {
        let found = lookup.lookup_options(&request).await?;
        debug!(
            dimension = %request.dimension,
            restricted = request.restriction != Restriction::Unrestricted,
            count = found.len(),
            "Reconciled filter options"
        );
        options.set(request.dimension, found);
    }

    Ok(options)
}

//! Catalog result types.

use serde::{Deserialize, Serialize};

use super::filters::FilterDimension;

/// One row of the medication search.
///
/// The name columns come from left joins and may be missing; the id columns
/// are kept even when their filter is unused because they drive option
/// reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicationRow {
    /// Product name.
    pub med_name: String,
    /// Free-text dosage.
    pub dosage: Option<String>,
    /// Manufacturer name.
    pub manufacturer_name: Option<String>,
    /// Pharmaceutic form name.
    pub form_name: Option<String>,
    /// Active ingredient name.
    pub ingredient_name: Option<String>,
    /// Condition name.
    pub condition_name: Option<String>,
    /// Condition id.
    pub condition_id: Option<i32>,
    /// Manufacturer id.
    pub manufacturer_id: Option<i32>,
    /// Pharmaceutic form id.
    pub form_id: Option<i32>,
    /// Active ingredient id.
    pub ingredient_id: Option<i32>,
    /// Similarity of the product name to the search term.
    pub name_similarity: Option<f32>,
    /// Similarity of the ingredient name to the search term.
    pub ingredient_similarity: Option<f32>,
}

/// A selectable dropdown entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FilterOption {
    /// The value submitted in the query string.
    pub value: String,
    /// The human-readable label.
    pub label: String,
}

impl FilterOption {
    /// Creates an option from an id-keyed reference row.
    pub fn from_reference(id: i32, name: Option<String>) -> Self {
        Self {
            value: id.to_string(),
            label: name.unwrap_or_default(),
        }
    }

    /// Creates an option whose value is also its label.
    pub fn from_value(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// The five dropdown lists offered by the search page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Condition options.
    pub conditions: Vec<FilterOption>,
    /// Manufacturer options.
    pub manufacturers: Vec<FilterOption>,
    /// Dosage options, sorted ascending.
    pub dosages: Vec<FilterOption>,
    /// Pharmaceutic form options.
    pub forms: Vec<FilterOption>,
    /// Active ingredient options.
    pub active_ingredients: Vec<FilterOption>,
}

impl FilterOptions {
    /// Returns the options of one dimension.
    pub fn get(&self, dimension: FilterDimension) -> &[FilterOption] {
        match dimension {
            FilterDimension::Condition => &self.conditions,
            FilterDimension::Manufacturer => &self.manufacturers,
            FilterDimension::Dosage => &self.dosages,
            FilterDimension::Form => &self.forms,
            FilterDimension::ActiveIngredient => &self.active_ingredients,
        }
    }

    /// Replaces the options of one dimension.
    pub fn set(&mut self, dimension: FilterDimension, options: Vec<FilterOption>) {
        match dimension {
            FilterDimension::Condition => self.conditions = options,
            FilterDimension::Manufacturer => self.manufacturers = options,
            FilterDimension::Dosage => self.dosages = options,
            FilterDimension::Form => self.forms = options,
            FilterDimension::ActiveIngredient => self.active_ingredients = options,
        }
    }
}

/// Result rows plus the reconciled filter options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Matching rows, ordered by product name then dosage.
    pub rows: Vec<MedicationRow>,
    /// Dropdown options still reachable from `rows`.
    pub options: FilterOptions,
}

impl SearchOutcome {
    /// Returns true if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A product listed on an ingredient detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationSummary {
    /// Product name.
    pub med_name: String,
    /// Free-text dosage.
    pub dosage: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_options_get_set() {
        let mut options = FilterOptions::default();
        options.set(
            FilterDimension::Form,
            vec![FilterOption::from_reference(2, Some("Comprimé".to_string()))],
        );
        assert_eq!(options.get(FilterDimension::Form).len(), 1);
        assert_eq!(options.get(FilterDimension::Form)[0].value, "2");
        assert!(options.get(FilterDimension::Condition).is_empty());
    }
}

//! Search filter types.
//!
//! A search request carries an optional free-text term and five optional
//! categorical filters. Absent and empty parameters are equivalent: both mean
//! "filter not applied", so every constructor funnels raw input through the
//! same normalization.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A filterable dimension of the medication catalog.
///
/// Each dimension has a dropdown on the search page whose options are
/// reconciled against the current result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterDimension {
    /// Medical condition treated (`conditions` table).
    Condition,
    /// Manufacturer (`manufacturer` table).
    Manufacturer,
    /// Free-text dosage stored on the product row.
    Dosage,
    /// Pharmaceutic form, reached through the product's subform.
    Form,
    /// Active ingredient (`active_ingredient` table).
    ActiveIngredient,
}

impl FilterDimension {
    /// All dimensions, in the order the search page displays them.
    pub const ALL: [FilterDimension; 5] = [
        FilterDimension::Condition,
        FilterDimension::Manufacturer,
        FilterDimension::Dosage,
        FilterDimension::Form,
        FilterDimension::ActiveIngredient,
    ];

    /// Returns the query-string parameter name for this dimension.
    pub fn param_name(&self) -> &'static str {
        match self {
            FilterDimension::Condition => "condition",
            FilterDimension::Manufacturer => "manufacturer",
            FilterDimension::Dosage => "dosage",
            FilterDimension::Form => "form",
            FilterDimension::ActiveIngredient => "active_ingredient",
        }
    }
}

impl fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.param_name())
    }
}

/// Raw, untyped search parameters as they arrive from a request.
///
/// Every field is optional; unknown parameters are simply not represented.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSearchParams {
    /// Free-text term matched against product and ingredient names.
    #[serde(default)]
    pub search: Option<String>,
    /// Condition id.
    #[serde(default)]
    pub condition: Option<String>,
    /// Manufacturer id.
    #[serde(default)]
    pub manufacturer: Option<String>,
    /// Exact dosage string.
    #[serde(default)]
    pub dosage: Option<String>,
    /// Pharmaceutic form id.
    #[serde(default)]
    pub form: Option<String>,
    /// Active ingredient id.
    #[serde(default)]
    pub active_ingredient: Option<String>,
}

/// Validated search filters.
///
/// Two filter sets that differ only in empty-versus-absent parameters compare
/// equal, and therefore produce the same query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Free-text term, trimmed; never empty when present.
    pub search: Option<String>,
    /// Condition id.
    pub condition: Option<i32>,
    /// Manufacturer id.
    pub manufacturer: Option<i32>,
    /// Exact dosage string; never empty when present.
    pub dosage: Option<String>,
    /// Pharmaceutic form id.
    pub form: Option<i32>,
    /// Active ingredient id.
    pub active_ingredient: Option<i32>,
}

impl SearchFilters {
    /// Creates an empty filter set (matches every product).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses raw request parameters.
    ///
    /// Empty values are dropped. Id filters must parse as integers.
    pub fn parse(raw: &RawSearchParams) -> Result<Self, ValidationError> {
        Ok(Self {
            search: non_empty(raw.search.as_deref().map(str::trim)),
            condition: parse_id(FilterDimension::Condition, raw.condition.as_deref())?,
            manufacturer: parse_id(FilterDimension::Manufacturer, raw.manufacturer.as_deref())?,
            dosage: non_empty(raw.dosage.as_deref()),
            form: parse_id(FilterDimension::Form, raw.form.as_deref())?,
            active_ingredient: parse_id(
                FilterDimension::ActiveIngredient,
                raw.active_ingredient.as_deref(),
            )?,
        })
    }

    /// Sets the free-text term.
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = non_empty(Some(term.into().trim()));
        self
    }

    /// Sets the condition filter.
    pub fn with_condition(mut self, id: i32) -> Self {
        self.condition = Some(id);
        self
    }

    /// Sets the manufacturer filter.
    pub fn with_manufacturer(mut self, id: i32) -> Self {
        self.manufacturer = Some(id);
        self
    }

    /// Sets the dosage filter.
    pub fn with_dosage(mut self, dosage: impl Into<String>) -> Self {
        self.dosage = non_empty(Some(dosage.into().as_str()));
        self
    }

    /// Sets the form filter.
    pub fn with_form(mut self, id: i32) -> Self {
        self.form = Some(id);
        self
    }

    /// Sets the active ingredient filter.
    pub fn with_active_ingredient(mut self, id: i32) -> Self {
        self.active_ingredient = Some(id);
        self
    }

    /// Returns the free-text term, if any.
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Returns true if no filter at all is applied.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns the selected value of a dimension as it appears in the
    /// query string, used to mark the selected dropdown option.
    pub fn selected(&self, dimension: FilterDimension) -> Option<String> {
        match dimension {
            FilterDimension::Condition => self.condition.map(|v| v.to_string()),
            FilterDimension::Manufacturer => self.manufacturer.map(|v| v.to_string()),
            FilterDimension::Dosage => self.dosage.clone(),
            FilterDimension::Form => self.form.map(|v| v.to_string()),
            FilterDimension::ActiveIngredient => self.active_ingredient.map(|v| v.to_string()),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(String::from)
}

fn parse_id(dimension: FilterDimension, value: Option<&str>) -> Result<Option<i32>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse::<i32>()
            .map(Some)
            .map_err(|_| ValidationError::InvalidFilterValue {
                filter: dimension.param_name().to_string(),
                value: v.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawSearchParams {
        RawSearchParams::default()
    }

    #[test]
    fn test_empty_and_absent_are_equivalent() {
        let absent = SearchFilters::parse(&raw()).unwrap();
        let empty = SearchFilters::parse(&RawSearchParams {
            search: Some(String::new()),
            condition: Some(String::new()),
            manufacturer: Some(String::new()),
            dosage: Some(String::new()),
            form: Some(String::new()),
            active_ingredient: Some(String::new()),
        })
        .unwrap();
        assert_eq!(absent, empty);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_condition_only() {
        let filters = SearchFilters::parse(&RawSearchParams {
            condition: Some("5".to_string()),
            manufacturer: Some(String::new()),
            ..raw()
        })
        .unwrap();
        assert_eq!(filters.condition, Some(5));
        assert_eq!(filters.manufacturer, None);
    }

    #[test]
    fn test_search_term_is_trimmed() {
        let filters = SearchFilters::parse(&RawSearchParams {
            search: Some("  aspirin ".to_string()),
            ..raw()
        })
        .unwrap();
        assert_eq!(filters.search_term(), Some("aspirin"));

        let blank = SearchFilters::parse(&RawSearchParams {
            search: Some("   ".to_string()),
            ..raw()
        })
        .unwrap();
        assert_eq!(blank.search_term(), None);
    }

    #[test]
    fn test_dosage_is_kept_verbatim() {
        let filters = SearchFilters::parse(&RawSearchParams {
            dosage: Some("500 mg".to_string()),
            ..raw()
        })
        .unwrap();
        assert_eq!(filters.dosage.as_deref(), Some("500 mg"));
    }

    #[test]
    fn test_non_numeric_id_is_rejected() {
        let err = SearchFilters::parse(&RawSearchParams {
            form: Some("1 OR 1=1".to_string()),
            ..raw()
        })
        .unwrap_err();
        match err {
            ValidationError::InvalidFilterValue { filter, .. } => assert_eq!(filter, "form"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_selected_values() {
        let filters = SearchFilters::new()
            .with_manufacturer(7)
            .with_dosage("10 mg");
        assert_eq!(
            filters.selected(FilterDimension::Manufacturer).as_deref(),
            Some("7")
        );
        assert_eq!(
            filters.selected(FilterDimension::Dosage).as_deref(),
            Some("10 mg")
        );
        assert_eq!(filters.selected(FilterDimension::Condition), None);
    }

    #[test]
    fn test_dimension_param_names() {
        let names: Vec<_> = FilterDimension::ALL.iter().map(|d| d.param_name()).collect();
        assert_eq!(
            names,
            vec!["condition", "manufacturer", "dosage", "form", "active_ingredient"]
        );
    }
}

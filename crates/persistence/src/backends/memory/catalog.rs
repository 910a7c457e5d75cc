//! In-memory catalog.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::core::{CatalogStore, ReferenceLookup};
use crate::error::StorageResult;
use crate::search::{MedicationQuery, OptionRequest, Restriction, trigram};
use crate::types::{FilterDimension, FilterOption, MedicationRow, MedicationSummary, UserRecord};

/// A product row as stored in `medicaments`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductRecord {
    /// Product name.
    pub med_name: String,
    /// Dosage.
    pub dosage: Option<String>,
    /// Condition id.
    pub condition_id: Option<i32>,
    /// Manufacturer id.
    pub manu_id: Option<i32>,
    /// Active ingredient id.
    pub ain_id: Option<i32>,
    /// Subform id.
    pub subform_id: Option<i32>,
}

impl ProductRecord {
    /// Creates a product with no references.
    pub fn new(med_name: impl Into<String>) -> Self {
        Self {
            med_name: med_name.into(),
            ..Default::default()
        }
    }

    /// Sets the dosage.
    pub fn dosage(mut self, dosage: impl Into<String>) -> Self {
        self.dosage = Some(dosage.into());
        self
    }

    /// Sets the condition id.
    pub fn condition(mut self, id: i32) -> Self {
        self.condition_id = Some(id);
        self
    }

    /// Sets the manufacturer id.
    pub fn manufacturer(mut self, id: i32) -> Self {
        self.manu_id = Some(id);
        self
    }

    /// Sets the active ingredient id.
    pub fn ingredient(mut self, id: i32) -> Self {
        self.ain_id = Some(id);
        self
    }

    /// Sets the subform id.
    pub fn subform(mut self, id: i32) -> Self {
        self.subform_id = Some(id);
        self
    }
}

#[derive(Debug, Default)]
pub(super) struct CatalogData {
    conditions: BTreeMap<i32, String>,
    manufacturers: BTreeMap<i32, String>,
    forms: BTreeMap<i32, String>,
    subforms: BTreeMap<i32, i32>,
    ingredients: BTreeMap<i32, String>,
    products: Vec<ProductRecord>,
}

#[derive(Debug, Default)]
pub(super) struct AccountData {
    pub(super) users: Vec<UserRecord>,
    pub(super) next_id: i64,
}

/// In-memory catalog and account store.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    catalog: RwLock<CatalogData>,
    pub(super) accounts: RwLock<AccountData>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend holding a small demonstration catalog.
    pub fn with_sample_data() -> Self {
        let backend = Self::new();
        backend.insert_condition(1, "Pain");
        backend.insert_condition(2, "Fever");
        backend.insert_condition(3, "Type 2 diabetes");
        backend.insert_manufacturer(1, "Sanofi");
        backend.insert_manufacturer(2, "Bayer");
        backend.insert_manufacturer(3, "Biogaran");
        backend.insert_form(1, "Tablet");
        backend.insert_form(2, "Oral solution");
        backend.insert_subform(10, 1);
        backend.insert_subform(11, 1);
        backend.insert_subform(20, 2);
        backend.insert_ingredient(1, "aspirin");
        backend.insert_ingredient(2, "paracetamol");
        backend.insert_ingredient(3, "metformin");
        backend.insert_product(
            ProductRecord::new("Aspirin Protect")
                .dosage("100 mg")
                .condition(1)
                .manufacturer(2)
                .ingredient(1)
                .subform(10),
        );
        backend.insert_product(
            ProductRecord::new("Aspirin Upsa")
                .dosage("500 mg")
                .condition(2)
                .manufacturer(1)
                .ingredient(1)
                .subform(11),
        );
        backend.insert_product(
            ProductRecord::new("Doliprane")
                .dosage("1000 mg")
                .condition(2)
                .manufacturer(1)
                .ingredient(2)
                .subform(10),
        );
        backend.insert_product(
            ProductRecord::new("Doliprane")
                .dosage("2.4 %")
                .condition(2)
                .manufacturer(1)
                .ingredient(2)
                .subform(20),
        );
        backend.insert_product(
            ProductRecord::new("Metformine Biogaran")
                .dosage("850 mg")
                .condition(3)
                .manufacturer(3)
                .ingredient(3)
                .subform(10),
        );
        backend
    }

    /// Inserts or replaces a condition.
    pub fn insert_condition(&self, id: i32, name: impl Into<String>) {
        self.catalog.write().conditions.insert(id, name.into());
    }

    /// Inserts or replaces a manufacturer.
    pub fn insert_manufacturer(&self, id: i32, name: impl Into<String>) {
        self.catalog.write().manufacturers.insert(id, name.into());
    }

    /// Inserts or replaces a pharmaceutic form.
    pub fn insert_form(&self, id: i32, name: impl Into<String>) {
        self.catalog.write().forms.insert(id, name.into());
    }

    /// Inserts or replaces a subform of `form_id`.
    pub fn insert_subform(&self, subform_id: i32, form_id: i32) {
        self.catalog.write().subforms.insert(subform_id, form_id);
    }

    /// Inserts or replaces an active ingredient.
    pub fn insert_ingredient(&self, id: i32, name: impl Into<String>) {
        self.catalog.write().ingredients.insert(id, name.into());
    }

    /// Appends a product.
    pub fn insert_product(&self, product: ProductRecord) {
        self.catalog.write().products.push(product);
    }
}

impl CatalogData {
    fn join(&self, product: &ProductRecord) -> MedicationRow {
        let form_id = product
            .subform_id
            .and_then(|id| self.subforms.get(&id).copied())
            .filter(|id| self.forms.contains_key(id));

        MedicationRow {
            med_name: product.med_name.clone(),
            dosage: product.dosage.clone(),
            manufacturer_name: lookup(&self.manufacturers, product.manu_id),
            form_name: lookup(&self.forms, form_id),
            ingredient_name: lookup(&self.ingredients, product.ain_id),
            condition_name: lookup(&self.conditions, product.condition_id),
            condition_id: product.condition_id,
            manufacturer_id: product.manu_id,
            form_id,
            ingredient_id: product.ain_id,
            name_similarity: None,
            ingredient_similarity: None,
        }
    }

    fn reference_table(&self, dimension: FilterDimension) -> Option<&BTreeMap<i32, String>> {
        match dimension {
            FilterDimension::Condition => Some(&self.conditions),
            FilterDimension::Manufacturer => Some(&self.manufacturers),
            FilterDimension::Form => Some(&self.forms),
            FilterDimension::ActiveIngredient => Some(&self.ingredients),
            FilterDimension::Dosage => None,
        }
    }
}

fn lookup(table: &BTreeMap<i32, String>, id: Option<i32>) -> Option<String> {
    id.and_then(|id| table.get(&id).cloned())
}

/// Orders like `ORDER BY med_name, dosage`: NULL dosages sort last.
fn compare_rows(a: &str, a_dosage: &Option<String>, b: &str, b_dosage: &Option<String>) -> Ordering {
    a.cmp(b).then_with(|| match (a_dosage, b_dosage) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    })
}

#[async_trait]
impl ReferenceLookup for MemoryBackend {
    async fn lookup_options(&self, request: &OptionRequest) -> StorageResult<Vec<FilterOption>> {
        let catalog = self.catalog.read();

        let Some(table) = catalog.reference_table(request.dimension) else {
            let dosages: BTreeSet<&str> = catalog
                .products
                .iter()
                .filter_map(|p| p.dosage.as_deref())
                .filter(|d| !d.is_empty())
                .filter(|d| match &request.restriction {
                    Restriction::Values(values) => values.iter().any(|v| v == d),
                    _ => true,
                })
                .collect();
            return Ok(dosages.into_iter().map(FilterOption::from_value).collect());
        };

        let mut options: Vec<(&String, i32)> = table
            .iter()
            .filter(|(id, _)| match &request.restriction {
                Restriction::Ids(ids) => ids.contains(*id),
                _ => true,
            })
            .map(|(id, name)| (name, *id))
            .collect();
        options.sort();

        Ok(options
            .into_iter()
            .map(|(name, id)| FilterOption::from_reference(id, Some(name.clone())))
            .collect())
    }
}

#[async_trait]
impl CatalogStore for MemoryBackend {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn find_medications(&self, query: &MedicationQuery) -> StorageResult<Vec<MedicationRow>> {
        let catalog = self.catalog.read();
        let filters = &query.filters;
        let threshold = query.similarity_threshold.value();

        let mut rows: Vec<MedicationRow> = catalog
            .products
            .iter()
            .map(|product| catalog.join(product))
            .filter_map(|mut row| {
                if let Some(term) = filters.search_term() {
                    let name_score = trigram::similarity(&row.med_name, term);
                    let ingredient_score = row
                        .ingredient_name
                        .as_deref()
                        .map(|name| trigram::similarity(name, term));
                    let matches = name_score > threshold
                        || ingredient_score.is_some_and(|score| score > threshold);
                    if !matches {
                        return None;
                    }
                    row.name_similarity = Some(name_score);
                    row.ingredient_similarity = ingredient_score;
                }
                Some(row)
            })
            .filter(|row| filters.condition.is_none_or(|id| row.condition_id == Some(id)))
            .filter(|row| filters.manufacturer.is_none_or(|id| row.manufacturer_id == Some(id)))
            .filter(|row| {
                filters
                    .dosage
                    .as_ref()
                    .is_none_or(|d| row.dosage.as_ref() == Some(d))
            })
            .filter(|row| filters.form.is_none_or(|id| row.form_id == Some(id)))
            .filter(|row| {
                filters
                    .active_ingredient
                    .is_none_or(|id| row.ingredient_id == Some(id))
            })
            .collect();

        rows.sort_by(|a, b| compare_rows(&a.med_name, &a.dosage, &b.med_name, &b.dosage));
        Ok(rows)
    }

    async fn medications_by_ingredient(
        &self,
        ingredient_name: &str,
    ) -> StorageResult<Vec<MedicationSummary>> {
        let catalog = self.catalog.read();

        let mut products: Vec<MedicationSummary> = catalog
            .products
            .iter()
            .filter(|p| {
                p.ain_id
                    .and_then(|id| catalog.ingredients.get(&id))
                    .is_some_and(|name| name == ingredient_name)
            })
            .map(|p| MedicationSummary {
                med_name: p.med_name.clone(),
                dosage: p.dosage.clone(),
            })
            .collect();

        products.sort_by(|a, b| compare_rows(&a.med_name, &a.dosage, &b.med_name, &b.dosage));
        Ok(products)
    }

    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::search_catalog;
    use crate::types::SearchFilters;

    fn search(backend: &MemoryBackend, filters: SearchFilters) -> Vec<MedicationRow> {
        tokio_test::block_on(backend.find_medications(&MedicationQuery::new(filters))).unwrap()
    }

    #[test]
    fn test_no_filters_returns_everything_ordered() {
        let backend = MemoryBackend::with_sample_data();
        let rows = search(&backend, SearchFilters::new());
        let names: Vec<_> = rows
            .iter()
            .map(|r| (r.med_name.as_str(), r.dosage.as_deref()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("Aspirin Protect", Some("100 mg")),
                ("Aspirin Upsa", Some("500 mg")),
                ("Doliprane", Some("1000 mg")),
                ("Doliprane", Some("2.4 %")),
                ("Metformine Biogaran", Some("850 mg")),
            ]
        );
        assert!(rows.iter().all(|r| r.name_similarity.is_none()));
    }

    #[test]
    fn test_term_matches_ingredient_name() {
        let backend = MemoryBackend::with_sample_data();
        let rows = search(&backend, SearchFilters::new().with_search("paracetamol"));
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.med_name == "Doliprane"));
        assert_eq!(rows[0].ingredient_similarity, Some(1.0));
    }

    #[test]
    fn test_term_below_threshold_is_empty() {
        let backend = MemoryBackend::with_sample_data();
        let rows = search(&backend, SearchFilters::new().with_search("zzzz"));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_left_joins_keep_unreferenced_products() {
        let backend = MemoryBackend::new();
        backend.insert_product(ProductRecord::new("Orphan").manufacturer(99).subform(5));
        let rows = search(&backend, SearchFilters::new());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].manufacturer_id, Some(99));
        assert!(rows[0].manufacturer_name.is_none());
        assert!(rows[0].form_id.is_none());
    }

    #[test]
    fn test_form_filter_goes_through_subform() {
        let backend = MemoryBackend::with_sample_data();
        let rows = search(&backend, SearchFilters::new().with_form(2));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].dosage.as_deref(), Some("2.4 %"));
        assert_eq!(rows[0].form_name.as_deref(), Some("Oral solution"));
    }

    #[test]
    fn test_dosage_is_exact_match() {
        let backend = MemoryBackend::with_sample_data();
        assert_eq!(search(&backend, SearchFilters::new().with_dosage("500 mg")).len(), 1);
        assert!(search(&backend, SearchFilters::new().with_dosage("500")).is_empty());
    }

    #[tokio::test]
    async fn test_options_follow_results() {
        let backend = MemoryBackend::with_sample_data();
        let query = MedicationQuery::new(SearchFilters::new().with_search("aspirin"));

        let outcome = search_catalog(&backend, &query).await.unwrap();

        assert_eq!(outcome.rows.len(), 2);
        let conditions: Vec<_> = outcome.options.conditions.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(conditions, vec!["Fever", "Pain"]);
        let dosages: Vec<_> = outcome.options.dosages.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(dosages, vec!["100 mg", "500 mg"]);
        assert_eq!(outcome.options.active_ingredients.len(), 1);
        assert_eq!(outcome.options.forms.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_result_offers_everything() {
        let backend = MemoryBackend::with_sample_data();
        let query = MedicationQuery::new(SearchFilters::new().with_search("zzzz"));

        let outcome = search_catalog(&backend, &query).await.unwrap();

        assert!(outcome.is_empty());
        assert_eq!(outcome.options.conditions.len(), 3);
        assert_eq!(outcome.options.manufacturers.len(), 3);
        assert_eq!(outcome.options.dosages.len(), 5);
        assert_eq!(outcome.options.forms.len(), 2);
        assert_eq!(outcome.options.active_ingredients.len(), 3);
    }

    #[tokio::test]
    async fn test_products_by_ingredient() {
        let backend = MemoryBackend::with_sample_data();
        let products = backend.medications_by_ingredient("aspirin").await.unwrap();
        let names: Vec<_> = products.iter().map(|p| p.med_name.as_str()).collect();
        assert_eq!(names, vec!["Aspirin Protect", "Aspirin Upsa"]);
        assert!(backend.medications_by_ingredient("Aspirin").await.unwrap().is_empty());
    }
}

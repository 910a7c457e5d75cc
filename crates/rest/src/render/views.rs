//! View models handed to the templates.

// View model fields are named after the template variables they feed
#![allow(missing_docs)]

use serde::Serialize;
use url::Url;

use medisae_persistence::types::{
    DocumentSection, FilterDimension, FilterOption, IngredientDocument, MedicationRow,
    MedicationSummary, SearchFilters, SearchOutcome, SectionLayout,
};

const NOT_AVAILABLE: &str = "N/A";
const UNKNOWN_INGREDIENT: &str = "Unknown Ingredient";

/// The signed-in visitor shown in the navigation bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavUser {
    pub username: String,
}

/// Landing page.
#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub title: &'static str,
    pub user: Option<NavUser>,
}

impl HomeView {
    pub fn new(user: Option<NavUser>) -> Self {
        Self {
            title: "Home",
            user,
        }
    }
}

/// One entry of a dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// One filter dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSelect {
    /// Query-string parameter.
    pub name: &'static str,
    /// Placeholder option label.
    pub label: &'static str,
    pub options: Vec<OptionView>,
}

impl FilterSelect {
    fn new(dimension: FilterDimension, options: &[FilterOption], selected: Option<&str>) -> Self {
        Self {
            name: dimension.param_name(),
            label: dimension_label(dimension),
            options: options
                .iter()
                .map(|option| OptionView {
                    value: option.value.clone(),
                    label: option.label.clone(),
                    selected: selected == Some(option.value.as_str()),
                })
                .collect(),
        }
    }
}

fn dimension_label(dimension: FilterDimension) -> &'static str {
    match dimension {
        FilterDimension::Condition => "Condition",
        FilterDimension::Manufacturer => "Manufacturer",
        FilterDimension::Dosage => "Dosage",
        FilterDimension::Form => "Pharmaceutical Form",
        FilterDimension::ActiveIngredient => "Active Ingredient",
    }
}

/// One result card. Missing names are shown as `N/A`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultView {
    pub med_name: String,
    pub ingredient: String,
    pub manufacturer: String,
    pub condition: String,
    pub dosage: String,
    pub form: String,
    /// Link to the ingredient page, absent when the ingredient is unknown.
    pub detail_href: Option<String>,
}

impl From<&MedicationRow> for ResultView {
    fn from(row: &MedicationRow) -> Self {
        let or_na = |value: &Option<String>| {
            value
                .clone()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        };

        Self {
            med_name: row.med_name.clone(),
            ingredient: row
                .ingredient_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_INGREDIENT.to_string()),
            manufacturer: or_na(&row.manufacturer_name),
            condition: or_na(&row.condition_name),
            dosage: or_na(&row.dosage),
            form: or_na(&row.form_name),
            detail_href: row.ingredient_name.as_deref().map(ingredient_href),
        }
    }
}

/// Search page: form state, dropdowns and results.
#[derive(Debug, Clone, Serialize)]
pub struct SearchView {
    pub title: &'static str,
    pub user: Option<NavUser>,
    /// Term echoed back into the search box.
    pub search: String,
    pub filters: Vec<FilterSelect>,
    pub results: Vec<ResultView>,
}

impl SearchView {
    pub fn new(user: Option<NavUser>, filters: &SearchFilters, outcome: &SearchOutcome) -> Self {
        Self {
            title: "Search",
            user,
            search: filters.search_term().unwrap_or_default().to_string(),
            filters: FilterDimension::ALL
                .iter()
                .map(|&dimension| {
                    let selected = filters.selected(dimension);
                    FilterSelect::new(dimension, outcome.options.get(dimension), selected.as_deref())
                })
                .collect(),
            results: outcome.rows.iter().map(ResultView::from).collect(),
        }
    }
}

/// Login form with its inline message.
#[derive(Debug, Clone, Serialize)]
pub struct LoginView {
    pub title: &'static str,
    pub user: Option<NavUser>,
    pub message: Option<String>,
    /// Email echoed back after a failed attempt.
    pub email: String,
}

impl LoginView {
    pub fn new(user: Option<NavUser>) -> Self {
        Self {
            title: "Login",
            user,
            message: None,
            email: String::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>, email: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self.email = email.into();
        self
    }
}

/// Registration fields echoed back into the form. The password never is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub age: String,
    pub profession: String,
}

/// Registration form with its inline message.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterView {
    pub title: &'static str,
    pub user: Option<NavUser>,
    pub message: Option<String>,
    pub form: RegisterForm,
}

impl RegisterView {
    pub fn new(user: Option<NavUser>) -> Self {
        Self {
            title: "Register",
            user,
            message: None,
            form: RegisterForm::default(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>, form: RegisterForm) -> Self {
        self.message = Some(message.into());
        self.form = form;
        self
    }
}

/// A titled block of ingredient metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionView {
    pub title: String,
    pub tabular: bool,
    pub entries: Vec<String>,
}

impl From<&DocumentSection> for SectionView {
    fn from(section: &DocumentSection) -> Self {
        Self {
            title: section.title.clone(),
            tabular: section.layout == SectionLayout::Table,
            entries: section.entries.clone(),
        }
    }
}

/// One product on the ingredient page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductView {
    pub med_name: String,
    pub dosage: String,
}

/// Active ingredient detail page.
#[derive(Debug, Clone, Serialize)]
pub struct IngredientView {
    pub title: String,
    pub user: Option<NavUser>,
    pub name: String,
    pub sections: Vec<SectionView>,
    pub products: Vec<ProductView>,
}

impl IngredientView {
    pub fn new(
        user: Option<NavUser>,
        name: &str,
        document: Option<&IngredientDocument>,
        products: &[MedicationSummary],
    ) -> Self {
        Self {
            title: name.to_string(),
            user,
            name: document.map(|d| d.name.clone()).unwrap_or_else(|| name.to_string()),
            sections: document
                .map(|d| d.sections.iter().map(SectionView::from).collect())
                .unwrap_or_default(),
            products: products
                .iter()
                .map(|p| ProductView {
                    med_name: p.med_name.clone(),
                    dosage: p
                        .dosage
                        .clone()
                        .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                })
                .collect(),
        }
    }
}

/// Error page rendered inside the layout.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorView {
    pub title: String,
    pub user: Option<NavUser>,
    pub status: u16,
    pub heading: String,
    pub details: String,
}

/// Builds the detail page path for an ingredient, percent-encoding the name.
pub fn ingredient_href(name: &str) -> String {
    let fallback = || format!("/ingredients/{}", name);
    let Ok(mut url) = Url::parse("http://localhost/ingredients/") else {
        return fallback();
    };
    match url.path_segments_mut() {
        Ok(mut segments) => {
            segments.pop_if_empty().push(name);
        }
        Err(()) => return fallback(),
    }
    url.path().to_string()
}

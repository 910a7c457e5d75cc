//! HTML page rendering.
//!
//! Pages are Handlebars templates compiled into the binary. Every page is a
//! partial block inside the shared `layout`, which draws the navigation bar
//! (username and logout link for a signed-in visitor, a sign-in link
//! otherwise) and the footer. Handlebars escapes every `{{value}}`, so view
//! models carry raw text.

mod views;

pub use views::{
    ErrorView, FilterSelect, HomeView, IngredientView, LoginView, NavUser, OptionView,
    ProductView, RegisterForm, RegisterView, ResultView, SearchView, SectionView,
    ingredient_href,
};

use handlebars::Handlebars;
use serde::Serialize;
use thiserror::Error;

/// A renderable page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Landing page.
    Home,
    /// Search form and results.
    Search,
    /// Login form.
    Login,
    /// Registration form.
    Register,
    /// Active ingredient detail page.
    Ingredient,
    /// Error page inside the layout.
    Error,
}

impl Page {
    /// All pages.
    pub const ALL: [Page; 6] = [
        Page::Home,
        Page::Search,
        Page::Login,
        Page::Register,
        Page::Ingredient,
        Page::Error,
    ];

    /// Template name in the registry.
    pub fn template_name(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Search => "search",
            Page::Login => "login",
            Page::Register => "register",
            Page::Ingredient => "ingredient",
            Page::Error => "error",
        }
    }

    fn source(&self) -> &'static str {
        match self {
            Page::Home => include_str!("../../templates/home.hbs"),
            Page::Search => include_str!("../../templates/search.hbs"),
            Page::Login => include_str!("../../templates/login.hbs"),
            Page::Register => include_str!("../../templates/register.hbs"),
            Page::Ingredient => include_str!("../../templates/ingredient.hbs"),
            Page::Error => include_str!("../../templates/error.hbs"),
        }
    }
}

const LAYOUT: &str = include_str!("../../templates/layout.hbs");

/// Errors raised while building or using the template registry.
#[derive(Debug, Error)]
pub enum TemplateLoadError {
    /// A compiled-in template failed to parse.
    #[error("template {name} is invalid: {source}")]
    Template {
        name: &'static str,
        #[source]
        source: Box<handlebars::TemplateError>,
    },
}

/// Owns the compiled templates.
#[derive(Debug)]
pub struct PageRenderer {
    registry: Handlebars<'static>,
}

impl PageRenderer {
    /// Compiles the layout and every page.
    pub fn new() -> Result<Self, TemplateLoadError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);

        registry
            .register_partial("layout", LAYOUT)
            .map_err(|e| TemplateLoadError::Template {
                name: "layout",
                source: Box::new(e),
            })?;

        for page in Page::ALL {
            registry
                .register_template_string(page.template_name(), page.source())
                .map_err(|e| TemplateLoadError::Template {
                    name: page.template_name(),
                    source: Box::new(e),
                })?;
        }

        Ok(Self { registry })
    }

    /// Renders a page with its view model.
    pub fn render<T: Serialize>(
        &self,
        page: Page,
        view: &T,
    ) -> Result<String, handlebars::RenderError> {
        self.registry.render(page.template_name(), view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medisae_persistence::types::{
        FilterOption, FilterOptions, MedicationRow, SearchFilters, SearchOutcome,
    };

    fn renderer() -> PageRenderer {
        PageRenderer::new().unwrap()
    }

    #[test]
    fn test_all_templates_compile() {
        let renderer = renderer();
        for page in Page::ALL {
            assert!(renderer.registry.has_template(page.template_name()));
        }
    }

    #[test]
    fn test_layout_shows_sign_in_when_anonymous() {
        let html = renderer().render(Page::Home, &HomeView::new(None)).unwrap();
        assert!(html.contains("MEDICSEARCH"));
        assert!(html.contains("Sign In"));
        assert!(!html.contains("Logout"));
        assert!(html.contains("Makes Your Health <span>Better</span>"));
        assert!(html.contains("Get Started"));
    }

    #[test]
    fn test_layout_shows_username_when_signed_in() {
        let user = NavUser {
            username: "alice".to_string(),
        };
        let html = renderer().render(Page::Home, &HomeView::new(Some(user))).unwrap();
        assert!(html.contains("<span>alice</span>"));
        assert!(html.contains("href=\"/logout\""));
        assert!(!html.contains("Sign In"));
    }

    #[test]
    fn test_search_page_escapes_and_defaults() {
        let outcome = SearchOutcome {
            rows: vec![MedicationRow {
                med_name: "<b>Aspirin</b>".to_string(),
                dosage: Some("500 mg".to_string()),
                ingredient_name: Some("aspirin".to_string()),
                ..Default::default()
            }],
            options: FilterOptions {
                dosages: vec![FilterOption::from_value("500 mg")],
                ..Default::default()
            },
        };
        let filters = SearchFilters::new().with_search("aspirin").with_dosage("500 mg");
        let view = SearchView::new(None, &filters, &outcome);

        let html = renderer().render(Page::Search, &view).unwrap();

        assert!(html.contains("&lt;b&gt;Aspirin&lt;/b&gt;"));
        assert!(html.contains("<strong>Manufacturer:</strong> N/A"));
        assert!(html.contains("<option value=\"500 mg\" selected>500 mg</option>"));
        assert!(html.contains("value=\"aspirin\""));
        assert!(!html.contains("No matches found"));
    }

    #[test]
    fn test_search_page_no_matches() {
        let view = SearchView::new(None, &SearchFilters::new(), &SearchOutcome::default());
        let html = renderer().render(Page::Search, &view).unwrap();
        assert!(html.contains("No matches found. Try adjusting your filters."));
        assert!(html.contains("Your Medicine Matches"));
        assert!(html.contains("<option value=\"\">Pharmaceutical Form</option>"));
    }

    #[test]
    fn test_ingredient_page_empty_states() {
        let view = IngredientView::new(None, "ghostine", None, &[]);
        let html = renderer().render(Page::Ingredient, &view).unwrap();
        assert!(html.contains("No details found for this active ingredient."));
        assert!(html.contains("No medicaments found for this active ingredient."));
    }
}

//! Axum extractors for the web application.
//!
//! - [`SearchForm`] - Validated search filters from the query string
//! - [`RequestContext`] - Store handle plus the signed-in user

mod context;
mod search_form;

pub use context::RequestContext;
pub use search_form::SearchForm;

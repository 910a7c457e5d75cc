//! Search filters extractor.
//!
//! Parses the search page query string into validated [`SearchFilters`].

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use medisae_persistence::types::{RawSearchParams, SearchFilters};

use crate::error::RestError;

/// Axum extractor for the search page filters.
///
/// Empty and absent parameters are equivalent. An id filter that is not an
/// integer rejects the request with a 400 page.
///
/// # Example
///
/// ```rust,ignore
/// use medisae_rest::extractors::SearchForm;
///
/// async fn search_handler(SearchForm(filters): SearchForm) {
///     println!("term: {:?}", filters.search_term());
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm(pub SearchFilters);

impl SearchForm {
    /// Validates raw parameters.
    pub fn from_raw(raw: &RawSearchParams) -> Result<Self, RestError> {
        SearchFilters::parse(raw).map(SearchForm).map_err(Into::into)
    }
}

impl<S> FromRequestParts<S> for SearchForm
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<RawSearchParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| RestError::BadRequest {
                message: format!("Invalid query parameters: {}", e.body_text()),
            })?;

        Self::from_raw(&raw)
    }
}

//! Search page handler.

use axum::{extract::State, response::Html};
use medisae_persistence::core::{CatalogStore, UserStore};
use medisae_persistence::search::{MedicationQuery, search_catalog};
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::{RequestContext, SearchForm};
use crate::handlers::pages::render_page;
use crate::render::{Page, SearchView};
use crate::state::AppState;

/// Handler for the search page.
///
/// Runs the filtered product search, then renders the results together with
/// dropdowns narrowed to the values present in them.
///
/// # HTTP Request
///
/// `GET /search?search=&condition=&manufacturer=&dosage=&form=&active_ingredient=`
///
/// # Response
///
/// - `200 OK` - Results page, possibly in the "no matches" state
/// - `400 Bad Request` - An id filter is not an integer
/// - `503 Service Unavailable` - The store is unreachable
pub async fn search_handler<S>(
    State(state): State<AppState<S>>,
    context: RequestContext<S>,
    SearchForm(filters): SearchForm,
) -> RestResult<Html<String>>
where
    S: CatalogStore + UserStore + 'static,
{
    let query = MedicationQuery::new(filters.clone()).with_threshold(state.config().threshold());
    let outcome = search_catalog(context.storage(), &query).await?;

    debug!(rows = outcome.rows.len(), "Search page ready");

    let view = SearchView::new(context.nav_user(), &filters, &outcome);
    render_page(&state, Page::Search, &view)
}

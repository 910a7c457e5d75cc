//! Static pages and the 404 fallback.

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use medisae_persistence::core::{CatalogStore, UserStore};
use serde::Serialize;

use crate::error::RestResult;
use crate::extractors::RequestContext;
use crate::render::{ErrorView, HomeView, Page};
use crate::state::AppState;

/// Renders a page through the shared template registry.
pub(crate) fn render_page<S, T>(state: &AppState<S>, page: Page, view: &T) -> RestResult<Html<String>>
where
    S: CatalogStore + UserStore,
    T: Serialize,
{
    Ok(Html(state.renderer().render(page, view)?))
}

/// Landing page.
///
/// # HTTP Request
///
/// `GET /`
pub async fn home_handler<S>(
    State(state): State<AppState<S>>,
    context: RequestContext<S>,
) -> RestResult<Html<String>>
where
    S: CatalogStore + UserStore + 'static,
{
    render_page(&state, Page::Home, &HomeView::new(context.nav_user()))
}

/// Fallback for unknown paths, rendered inside the layout.
pub async fn not_found_handler<S>(
    State(state): State<AppState<S>>,
    context: RequestContext<S>,
    uri: Uri,
) -> RestResult<Response>
where
    S: CatalogStore + UserStore + 'static,
{
    let view = ErrorView {
        title: "Page not found".to_string(),
        user: context.nav_user(),
        status: StatusCode::NOT_FOUND.as_u16(),
        heading: "Page not found".to_string(),
        details: format!("Nothing lives at {}", uri.path()),
    };
    let page = render_page(&state, Page::Error, &view)?;
    Ok((StatusCode::NOT_FOUND, page).into_response())
}

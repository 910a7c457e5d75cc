//! Active ingredient detail page handler.

use axum::{
    extract::{Path, State},
    response::Html,
};
use medisae_persistence::core::{CatalogStore, UserStore};
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::RequestContext;
use crate::handlers::pages::render_page;
use crate::render::{IngredientView, Page};
use crate::state::AppState;

/// Handler for the ingredient detail page.
///
/// Combines the ingredient's document (looked up by name) with the products
/// containing it. A missing document and an empty product list each render
/// their own empty state; neither is an error.
///
/// # HTTP Request
///
/// `GET /ingredients/{name}`
pub async fn ingredient_handler<S>(
    State(state): State<AppState<S>>,
    context: RequestContext<S>,
    Path(name): Path<String>,
) -> RestResult<Html<String>>
where
    S: CatalogStore + UserStore + 'static,
{
    let document = state.documents().find_ingredient(&name).await?;
    let products = context.storage().medications_by_ingredient(&name).await?;

    debug!(
        ingredient = %name,
        has_document = document.is_some(),
        products = products.len(),
        "Ingredient page ready"
    );

    let view = IngredientView::new(context.nav_user(), &name, document.as_ref(), &products);
    render_page(&state, Page::Ingredient, &view)
}

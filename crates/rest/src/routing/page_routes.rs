//! Page route configuration.
//!
//! Defines every route of the web application.

use axum::{
    Router,
    routing::get,
};
use medisae_persistence::core::{CatalogStore, UserStore};

use crate::handlers;
use crate::state::AppState;

/// Creates all routes.
///
/// # Routes
///
/// ## Pages
/// - `GET /` - Home
/// - `GET /search` - Search form and results
/// - `GET /ingredients/{name}` - Active ingredient detail
///
/// ## Accounts
/// - `GET /login`, `POST /login` - Login form
/// - `GET /register`, `POST /register` - Registration form
/// - `GET /logout` - End the session
///
/// ## Monitoring
/// - `GET /health` - Health check
/// - `GET /_liveness` - Liveness probe
/// - `GET /_readiness` - Readiness probe
///
/// Anything else renders the 404 page.
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: CatalogStore + UserStore + 'static,
{
    Router::new()
        // Pages
        .route("/", get(handlers::home_handler::<S>))
        .route("/search", get(handlers::search_handler::<S>))
        .route("/ingredients/{name}", get(handlers::ingredient_handler::<S>))
        // Accounts
        .route(
            "/login",
            get(handlers::login_page_handler::<S>).post(handlers::login_handler::<S>),
        )
        .route(
            "/register",
            get(handlers::register_page_handler::<S>).post(handlers::register_handler::<S>),
        )
        .route("/logout", get(handlers::logout_handler::<S>))
        // Monitoring
        .route("/health", get(handlers::health_handler::<S>))
        .route("/_liveness", get(handlers::liveness_handler))
        .route("/_readiness", get(handlers::readiness_handler::<S>))
        .fallback(handlers::not_found_handler::<S>)
        .with_state(state)
}

//! # medisae-rest - Medisae web application
//!
//! This crate serves the Medisae medication browser: a search page with
//! filters that narrow themselves to the current results, detail pages for
//! active ingredients, and account registration and login.
//!
//! ## Backend Support
//!
//! Storage backends are configured through feature flags:
//!
//! - `postgres` - PostgreSQL catalog and accounts (default)
//! - `mongodb` - MongoDB ingredient documents
//!
//! The in-memory backend is always available and is what the tests use.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use medisae_persistence::backends::memory::{MemoryBackend, MemoryDocumentStore};
//! use medisae_rest::{create_app_with_config, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = MemoryBackend::with_sample_data();
//!     let documents = Arc::new(MemoryDocumentStore::new());
//!     let config = ServerConfig::default();
//!
//!     let app = create_app_with_config(backend, documents, config)?;
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Endpoints
//!
//! | Page | HTTP Method | URL Pattern |
//! |------|-------------|-------------|
//! | home | GET | `/` |
//! | search | GET | `/search?search=&condition=&manufacturer=&dosage=&form=&active_ingredient=` |
//! | ingredient | GET | `/ingredients/{name}` |
//! | login | GET/POST | `/login` |
//! | register | GET/POST | `/register` |
//! | logout | GET | `/logout` |
//! | health | GET | `/health`, `/_liveness`, `/_readiness` |
//!
//! ## Error Handling
//!
//! Failures that abort a request render a plain HTML error page:
//!
//! | HTTP Status | Cause |
//! |-------------|-------|
//! | 400 | An id filter is not an integer |
//! | 404 | Unknown path |
//! | 500 | Query or template failure |
//! | 503 | Store unreachable |
//!
//! Account problems (taken email, wrong password) are shown inline instead.
//!
//! ## Architecture
//!
//! - [`error`] - Error types and the error page
//! - [`config`] - Server configuration
//! - [`state`] - Application state (stores, sessions, templates, configuration)
//! - [`session`] - In-process login sessions and the session cookie
//! - [`accounts`] - Registration and login
//! - [`render`] - Templates and view models
//! - [`handlers`] - HTTP request handlers
//! - [`extractors`] - Axum extractors for filters and the request context
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod accounts;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod render;
pub mod routing;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use config::{ServerConfig, StorageBackendMode};
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use axum::http::Method;
use medisae_persistence::backends::memory::MemoryDocumentStore;
use medisae_persistence::core::{CatalogStore, DynDocumentStore, UserStore};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use render::{PageRenderer, TemplateLoadError};

/// Creates the Axum application with default configuration and no
/// ingredient documents.
///
/// For more control, use [`create_app_with_config`].
pub fn create_app<S>(storage: S) -> Result<Router, TemplateLoadError>
where
    S: CatalogStore + UserStore + 'static,
{
    create_app_with_config(
        storage,
        Arc::new(MemoryDocumentStore::new()),
        ServerConfig::default(),
    )
}

/// Creates the Axum application with custom configuration.
///
/// This compiles the templates, builds the routes and applies the tracing,
/// timeout and optional CORS layers.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use medisae_persistence::backends::memory::{MemoryBackend, MemoryDocumentStore};
/// use medisae_rest::{create_app_with_config, ServerConfig};
///
/// let config = ServerConfig {
///     enable_cors: true,
///     ..ServerConfig::for_testing()
/// };
/// let app = create_app_with_config(
///     MemoryBackend::with_sample_data(),
///     Arc::new(MemoryDocumentStore::new()),
///     config,
/// );
/// assert!(app.is_ok());
/// ```
pub fn create_app_with_config<S>(
    storage: S,
    documents: DynDocumentStore,
    config: ServerConfig,
) -> Result<Router, TemplateLoadError>
where
    S: CatalogStore + UserStore + 'static,
{
    info!(
        backend = storage.backend_name(),
        documents = documents.store_name(),
        "Creating web application"
    );

    let renderer = PageRenderer::new()?;
    let state = AppState::new(Arc::new(storage), documents, renderer, config.clone());

    let router = routing::create_routes(state);

    // Build middleware stack
    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    // Add CORS if enabled
    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    Ok(router.layer(service_builder))
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods([Method::GET, Method::POST]);

    if config.cors_origins == "*" {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "medisae={level},medisae_rest={level},medisae_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

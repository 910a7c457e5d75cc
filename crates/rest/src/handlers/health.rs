//! Health check endpoint handlers.
//!
//! Provides health, liveness and readiness endpoints for monitoring and load
//! balancers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use medisae_persistence::core::{CatalogStore, UserStore};
use tracing::{debug, warn};

use crate::error::RestResult;
use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// # HTTP Request
///
/// `GET /health`
///
/// # Response
///
/// - `200 OK` - Server is up
pub async fn health_handler<S>(State(state): State<AppState<S>>) -> RestResult<Response>
where
    S: CatalogStore + UserStore + 'static,
{
    debug!("Processing health check request");

    let health_response = serde_json::json!({
        "status": "healthy",
        "backend": state.storage().backend_name(),
        "documents": state.documents().store_name(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    });

    Ok((StatusCode::OK, Json(health_response)).into_response())
}

/// Handler for the liveness probe.
///
/// # HTTP Request
///
/// `GET /_liveness`
pub async fn liveness_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Handler for the readiness probe.
///
/// Round-trips to the relational store.
///
/// # HTTP Request
///
/// `GET /_readiness`
///
/// # Response
///
/// - `200 OK` - The store answered
/// - `503 Service Unavailable` - The store did not answer
pub async fn readiness_handler<S>(State(state): State<AppState<S>>) -> RestResult<Response>
where
    S: CatalogStore + UserStore + 'static,
{
    debug!("Processing readiness check request");

    let backend_name = state.storage().backend_name();

    let (status, label, storage) = match state.storage().health_check().await {
        Ok(()) => (StatusCode::OK, "ready", "ok".to_string()),
        Err(e) => {
            warn!(backend = backend_name, error = %e, "Readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable", e.to_string())
        }
    };

    let response = serde_json::json!({
        "status": label,
        "backend": backend_name,
        "checks": {
            "storage": storage
        }
    });

    Ok((status, Json(response)).into_response())
}

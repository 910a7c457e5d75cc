//! Common test utilities for the web application.
//!
//! Builds a [`TestServer`] over the in-memory backend seeded with the
//! demonstration catalog, and helpers for the session cookie.

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::{HeaderValue, header};
use axum_test::{TestResponse, TestServer};
use medisae_persistence::backends::memory::{MemoryBackend, MemoryDocumentStore};
use medisae_persistence::core::{CatalogStore, UserStore};
use medisae_persistence::types::IngredientDocument;
use medisae_rest::{ServerConfig, create_app_with_config};

/// Creates a test server over the sample catalog and the given documents.
pub fn create_test_server_with(documents: MemoryDocumentStore) -> TestServer {
    create_server_for(MemoryBackend::with_sample_data(), documents)
}

/// Creates a test server over the sample catalog with one aspirin document.
pub fn create_test_server() -> TestServer {
    let documents = MemoryDocumentStore::new();
    documents.insert(IngredientDocument::from_fields(
        "aspirin",
        vec![
            ("Nom".to_string(), vec!["aspirin".to_string()]),
            (
                "Indications".to_string(),
                vec!["Douleur".to_string(), "Fièvre".to_string()],
            ),
            (
                "Précautions".to_string(),
                vec!["Ulcère gastroduodénal".to_string()],
            ),
        ],
    ));
    create_test_server_with(documents)
}

/// Creates a test server over any backend.
pub fn create_server_for<S>(backend: S, documents: MemoryDocumentStore) -> TestServer
where
    S: CatalogStore + UserStore + 'static,
{
    let app = create_app_with_config(backend, Arc::new(documents), ServerConfig::for_testing())
        .expect("Failed to build app");
    TestServer::new(app).expect("Failed to create test server")
}

/// Extracts the `name=value` pair of the session cookie from a response.
pub fn session_cookie(response: &TestResponse) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|pair| pair.trim().to_string())
}

/// A `Cookie` header value.
pub fn cookie_header(pair: &str) -> HeaderValue {
    HeaderValue::from_str(pair).expect("valid cookie")
}

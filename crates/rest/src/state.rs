//! Application state for the web application.
//!
//! This module defines the shared state that is available to all request
//! handlers: the relational store, the ingredient document store, the session
//! map, the compiled templates and the configuration.

use std::sync::Arc;

use medisae_persistence::core::{CatalogStore, DynDocumentStore, UserStore};

use crate::config::ServerConfig;
use crate::render::PageRenderer;
use crate::session::SessionStore;

/// Shared application state.
///
/// # Type Parameters
///
/// * `S` - The relational backend (must implement [`CatalogStore`] and [`UserStore`])
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use medisae_persistence::CatalogStore;
/// use medisae_persistence::backends::memory::{MemoryBackend, MemoryDocumentStore};
/// use medisae_rest::render::PageRenderer;
/// use medisae_rest::{AppState, ServerConfig};
///
/// let state = AppState::new(
///     Arc::new(MemoryBackend::with_sample_data()),
///     Arc::new(MemoryDocumentStore::new()),
///     PageRenderer::new().unwrap(),
///     ServerConfig::for_testing(),
/// );
/// assert_eq!(state.storage().backend_name(), "memory");
/// ```
pub struct AppState<S> {
    /// The relational backend.
    storage: Arc<S>,

    /// Ingredient metadata.
    documents: DynDocumentStore,

    /// Live login sessions.
    sessions: Arc<SessionStore>,

    /// Compiled templates.
    renderer: Arc<PageRenderer>,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

// Manually implement Clone since S is wrapped in Arc and doesn't need to be Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            documents: Arc::clone(&self.documents),
            sessions: Arc::clone(&self.sessions),
            renderer: Arc::clone(&self.renderer),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: CatalogStore + UserStore> AppState<S> {
    /// Creates a new AppState with an empty session map using the
    /// configured session lifetime.
    pub fn new(
        storage: Arc<S>,
        documents: DynDocumentStore,
        renderer: PageRenderer,
        config: ServerConfig,
    ) -> Self {
        Self {
            storage,
            documents,
            sessions: Arc::new(SessionStore::with_lifetime(config.session_lifetime())),
            renderer: Arc::new(renderer),
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the relational backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns a clone of the storage Arc.
    pub fn storage_arc(&self) -> Arc<S> {
        Arc::clone(&self.storage)
    }

    /// Returns the ingredient document store.
    pub fn documents(&self) -> &DynDocumentStore {
        &self.documents
    }

    /// Returns the session map.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Returns the compiled templates.
    pub fn renderer(&self) -> &PageRenderer {
        &self.renderer
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medisae_persistence::backends::memory::{MemoryBackend, MemoryDocumentStore};
    use crate::session::Session;
    use crate::config::MIN_BCRYPT_COST;

    fn state() -> AppState<MemoryBackend> {
        AppState::new(
            Arc::new(MemoryBackend::with_sample_data()),
            Arc::new(MemoryDocumentStore::new()),
            PageRenderer::new().unwrap(),
            ServerConfig::for_testing(),
        )
    }

    #[test]
    fn test_clone_shares_sessions() {
        let state = state();
        let cloned = state.clone();

        let token = state.sessions().create(Session {
            user_id: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            created_at: chrono::Utc::now(),
        });

        assert!(cloned.sessions().get(&token).is_some());
        assert!(Arc::ptr_eq(&state.storage_arc(), &cloned.storage_arc()));
    }

    #[test]
    fn test_accessors() {
        let state = state();
        assert_eq!(state.storage().backend_name(), "memory");
        assert_eq!(state.documents().store_name(), "memory");
        assert_eq!(state.config().bcrypt_cost, MIN_BCRYPT_COST);
    }
}

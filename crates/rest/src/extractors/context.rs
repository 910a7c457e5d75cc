//! Request-scoped context extractor.
//!
//! Bundles the store handle with the identity of the visitor, resolved from
//! the session cookie. Handlers receive it explicitly instead of reaching
//! into shared state for either.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use medisae_persistence::core::{CatalogStore, UserStore};

use crate::render::NavUser;
use crate::session::{Session, token_from_headers};
use crate::state::AppState;

/// The store handle plus the signed-in user, if any.
pub struct RequestContext<S> {
    storage: Arc<S>,
    session: Option<(String, Session)>,
}

impl<S> RequestContext<S> {
    /// Creates a context directly.
    pub fn new(storage: Arc<S>, session: Option<(String, Session)>) -> Self {
        Self { storage, session }
    }

    /// Returns the relational store.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the session of the signed-in user.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref().map(|(_, session)| session)
    }

    /// Returns the session token carried by the request.
    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|(token, _)| token.as_str())
    }

    /// Returns true if a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// The navigation bar identity.
    pub fn nav_user(&self) -> Option<NavUser> {
        self.session().map(|session| NavUser {
            username: session.username.clone(),
        })
    }
}

impl<S> FromRequestParts<AppState<S>> for RequestContext<S>
where
    S: CatalogStore + UserStore + 'static,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        // Unknown or expired tokens are treated as anonymous.
        let session = token_from_headers(&parts.headers)
            .and_then(|token| state.sessions().get(&token).map(|session| (token, session)));

        Ok(RequestContext::new(state.storage_arc(), session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::render::PageRenderer;
    use axum::http::{Request, header};
    use medisae_persistence::backends::memory::{MemoryBackend, MemoryDocumentStore};

    fn state() -> AppState<MemoryBackend> {
        AppState::new(
            Arc::new(MemoryBackend::new()),
            Arc::new(MemoryDocumentStore::new()),
            PageRenderer::new().unwrap(),
            ServerConfig::for_testing(),
        )
    }

    async fn extract(state: &AppState<MemoryBackend>, cookie: Option<&str>) -> RequestContext<MemoryBackend> {
        let mut builder = Request::builder().uri("/");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        RequestContext::from_request_parts(&mut parts, state).await.unwrap()
    }

    #[tokio::test]
    async fn test_anonymous_without_cookie() {
        let state = state();
        let context = extract(&state, None).await;
        assert!(!context.is_authenticated());
        assert_eq!(context.nav_user(), None);
    }

    #[tokio::test]
    async fn test_session_cookie_resolves_user() {
        let state = state();
        let token = state.sessions().create(Session {
            user_id: 7,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            created_at: chrono::Utc::now(),
        });

        let context = extract(&state, Some(&format!("medisae_session={}", token))).await;

        assert_eq!(context.session().map(|s| s.user_id), Some(7));
        assert_eq!(context.token(), Some(token.as_str()));
        assert_eq!(context.nav_user().map(|u| u.username), Some("alice".to_string()));
    }

    #[tokio::test]
    async fn test_expired_session_is_anonymous() {
        let state = AppState::new(
            Arc::new(MemoryBackend::new()),
            Arc::new(MemoryDocumentStore::new()),
            PageRenderer::new().unwrap(),
            ServerConfig {
                session_ttl: 60,
                ..ServerConfig::for_testing()
            },
        );
        let token = state.sessions().create(Session {
            user_id: 7,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            created_at: chrono::Utc::now() - chrono::TimeDelta::hours(2),
        });

        let context = extract(&state, Some(&format!("medisae_session={}", token))).await;

        assert!(!context.is_authenticated());
        assert!(state.sessions().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_token_is_anonymous() {
        let state = state();
        let context = extract(&state, Some("medisae_session=forged")).await;
        assert!(!context.is_authenticated());
    }
}

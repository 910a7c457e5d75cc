//! In-process login sessions.
//!
//! A successful login creates a [`Session`] keyed by a random token; the token
//! travels in an `HttpOnly` cookie. Sessions live only as long as the server
//! process, and no longer than the configured lifetime. Stale sessions are
//! dropped when looked up and pruned whenever a new one is created.

use std::collections::HashMap;
use std::time::Duration;

use axum::http::{HeaderMap, HeaderValue, header};
use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use uuid::Uuid;

use medisae_persistence::types::UserRecord;

use crate::config::DEFAULT_SESSION_TTL_SECS;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "medisae_session";

/// The identity attached to a logged-in browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Stored user id.
    pub user_id: i64,
    /// Display name shown in the navigation bar.
    pub username: String,
    /// Email the user logged in with.
    pub email: String,
    /// When the session started.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Starts a session for a stored user.
    pub fn for_user(user: &UserRecord) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: Utc::now(),
        }
    }

    /// Returns true once the session is at least `lifetime` old.
    pub fn is_expired(&self, lifetime: TimeDelta, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.created_at) >= lifetime
    }
}

/// Token to session map.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    lifetime: TimeDelta,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_lifetime(Duration::from_secs(DEFAULT_SESSION_TTL_SECS))
    }
}

impl SessionStore {
    /// Creates an empty store with the default lifetime.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store whose sessions expire after `lifetime`.
    pub fn with_lifetime(lifetime: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            lifetime: TimeDelta::from_std(lifetime).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Stores a session and returns its token, pruning expired sessions.
    pub fn create(&self, session: Session) -> String {
        let token = Uuid::new_v4().to_string();
        let now = Utc::now();
        let mut sessions = self.sessions.write();
        sessions.retain(|_, existing| !existing.is_expired(self.lifetime, now));
        sessions.insert(token.clone(), session);
        token
    }

    /// Returns the session for a token. An expired session is removed and
    /// treated as absent.
    pub fn get(&self, token: &str) -> Option<Session> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read();
            let session = sessions.get(token)?;
            if !session.is_expired(self.lifetime, now) {
                return Some(session.clone());
            }
        }
        self.sessions.write().remove(token);
        None
    }

    /// Ends a session. Returns the removed session, if any.
    pub fn remove(&self, token: &str) -> Option<Session> {
        self.sessions.write().remove(token)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Returns true if no session is live.
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

/// Reads the session token from the request's `Cookie` headers.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Builds the `Set-Cookie` value that establishes a session.
pub fn session_cookie(token: &str, secure: bool) -> HeaderValue {
    let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, token);
    if secure {
        cookie.push_str("; Secure");
    }
    // Tokens are UUIDs, so the value is always visible ASCII.
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| clear_session_cookie())
}

/// Builds the `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_static("medisae_session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

//! Cookie-backed HTTP sessions over a swappable store.
//!
//! The store interface is deliberately narrow (load/save/delete keyed by an
//! opaque session id) so the in-memory reference backend can be swapped for a
//! distributed cache or database without touching handler logic.
//!
//! # Coherence
//!
//! Handlers perform whole-record read-modify-write through the store. Requests
//! belonging to one browser session are expected to be serial; concurrent tabs
//! can race on first-time federation, which at worst triggers a redundant
//! exchange (no single-flight guarantee).

use crate::federation::AwsCredentialBundle;
use crate::state::AppState;
use async_trait::async_trait;
use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use parking_lot::RwLock;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Name of the session id cookie.
pub const SESSION_COOKIE: &str = "webid.sid";

/// Per-browser session state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// Whether the authorization-code exchange completed for this session
    pub is_authenticated: bool,
    /// Ephemeral anti-forgery state token, cleared after first use
    pub oauth_state: Option<String>,
    /// Google access token from the code exchange
    pub access_token: Option<String>,
    /// Google id token; stored without cryptographic validation and later
    /// forwarded to the federation exchange as-is
    pub id_token: Option<String>,
    /// Cached federated credentials (no expiry check)
    pub aws_credentials: Option<AwsCredentialBundle>,
}

/// Session store errors.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    /// Backend failure (unused by the memory store, present for swappable backends)
    #[error("session backend error: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, SessionStoreError>;

/// Narrow session store interface keyed by opaque session id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session by id, `None` if unknown or expired.
    async fn load(&self, id: &str) -> StoreResult<Option<Session>>;

    /// Persist a session under the given id, replacing any previous record.
    async fn save(&self, id: &str, session: Session) -> StoreResult<()>;

    /// Drop a session.
    async fn delete(&self, id: &str) -> StoreResult<()>;
}

/// Process-memory session store. Non-durable: all sessions are lost on
/// restart.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions (for logging/tests)
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Whether the store holds no sessions
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &str) -> StoreResult<Option<Session>> {
        Ok(self.sessions.read().get(id).cloned())
    }

    async fn save(&self, id: &str, session: Session) -> StoreResult<()> {
        self.sessions.write().insert(id.to_string(), session);
        Ok(())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.sessions.write().remove(id);
        Ok(())
    }
}

/// Session id of the current request, injected by [`ensure_session`].
#[derive(Debug, Clone)]
pub struct SessionId(pub String);

/// Generate an unguessable identifier (32 random bytes, URL-safe base64).
///
/// Also used for OAuth state tokens.
pub fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    URL_SAFE_NO_PAD.encode(bytes)
}

fn session_cookie(id: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Middleware that guarantees every request carries a live session.
///
/// Looks up the session id cookie; if absent or unknown to the store, creates
/// a fresh empty session and sets the cookie on the response. The resolved
/// [`SessionId`] is stored in request extensions for handlers.
pub async fn ensure_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let existing = match jar.get(SESSION_COOKIE) {
        Some(cookie) => {
            let id = cookie.value().to_string();
            match state.sessions.load(&id).await {
                Ok(Some(_)) => Some(id),
                Ok(None) => None,
                Err(e) => {
                    tracing::error!(error = %e, "session load failed");
                    None
                }
            }
        }
        None => None,
    };

    let (id, is_new) = match existing {
        Some(id) => (id, false),
        None => {
            let id = generate_token();
            if let Err(e) = state.sessions.save(&id, Session::default()).await {
                tracing::error!(error = %e, "session create failed");
            }
            tracing::debug!(session_id = %id, "session created");
            (id, true)
        }
    };

    request.extensions_mut().insert(SessionId(id.clone()));

    let response = next.run(request).await;

    if is_new {
        (CookieJar::new().add(session_cookie(id)), response).into_response()
    } else {
        response
    }
}

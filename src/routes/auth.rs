//! Google OAuth authorization-code flow endpoints.

use super::found;
use crate::error::{Result, ServerError};
use crate::oauth;
use crate::session::{self, SessionId};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Extension;
use serde::Deserialize;
use std::sync::Arc;

/// Query parameters of the provider callback. Both are optional so that
/// malformed callbacks fall into the play-dead path instead of a 400.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
}

/// GET /auth/gg/flow
///
/// Initiates the flow: stores a fresh anti-forgery state token in the
/// session and redirects the browser to the provider's authorization
/// endpoint. The token is validated when the callback comes in.
pub async fn flow(
    State(state): State<Arc<AppState>>,
    Extension(SessionId(session_id)): Extension<SessionId>,
) -> Result<Response> {
    let state_token = session::generate_token();

    let mut session = state
        .sessions
        .load(&session_id)
        .await?
        .ok_or_else(|| ServerError::internal("session disappeared mid-request"))?;
    session.oauth_state = Some(state_token.clone());
    state.sessions.save(&session_id, session).await?;

    let redirect_url = state.oauth.authorize_url(&state_token)?;
    tracing::debug!(session_id = %session_id, "redirecting to authorization endpoint");

    Ok(found(&redirect_url))
}

/// GET /auth/gg/redirect
///
/// Provider callback: validates the state token (single-use), exchanges the
/// authorization code for tokens, and marks the session authenticated.
///
/// A missing or mismatched state token gets an empty 200 — playing dead is
/// the only defense against forged callbacks and replayed stale redirects.
pub async fn redirect(
    State(state): State<Arc<AppState>>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Query(query): Query<CallbackQuery>,
) -> Result<Response> {
    let mut session = state
        .sessions
        .load(&session_id)
        .await?
        .ok_or_else(|| ServerError::internal("session disappeared mid-request"))?;

    match (&session.oauth_state, &query.state) {
        (Some(stored), Some(presented)) if stored == presented => {}
        _ => {
            tracing::warn!(session_id = %session_id, "invalid or missing state token");
            return Ok(StatusCode::OK.into_response());
        }
    }

    // State tokens are single-use: clear before the exchange so a replayed
    // callback is treated as a mismatch even if the exchange fails.
    session.oauth_state = None;
    state.sessions.save(&session_id, session.clone()).await?;

    let code = query.code.unwrap_or_default();
    let tokens = state.oauth.exchange_code(&code).await?;

    // Claims are peeked unverified, for logging only.
    if let Some((sub, email)) = oauth::unverified_subject(&tokens.id_token) {
        tracing::info!(session_id = %session_id, sub = %sub, email = ?email, "login completed");
    } else {
        tracing::info!(session_id = %session_id, "login completed (opaque id token)");
    }

    session.is_authenticated = true;
    session.access_token = Some(tokens.access_token);
    session.id_token = Some(tokens.id_token);
    state.sessions.save(&session_id, session).await?;

    Ok(found("/"))
}

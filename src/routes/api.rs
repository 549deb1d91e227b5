//! Protected API surface: the federated S3 listing endpoint.

use crate::error::{Result, ServerError};
use crate::federation;
use crate::session::SessionId;
use crate::state::AppState;
use crate::storage;
use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;
use std::sync::Arc;

/// Response body for the listing endpoint.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    /// Object keys in provider-returned order
    pub entries: Vec<String>,
}

/// GET /api/s3/list
///
/// Requires an authenticated session. Federates credentials on first use
/// (cached thereafter) and surfaces the first page of the bucket listing.
pub async fn s3_list(
    State(state): State<Arc<AppState>>,
    Extension(SessionId(session_id)): Extension<SessionId>,
) -> Result<Json<ListResponse>> {
    let session = state
        .sessions
        .load(&session_id)
        .await?
        .ok_or_else(|| ServerError::internal("session disappeared mid-request"))?;

    // Authorization gate before any downstream call
    if !session.is_authenticated {
        return Err(ServerError::forbidden("Please login first"));
    }

    let bundle = federation::credentials_for_session(&state, &session_id).await?;
    let entries = storage::list_bucket(&state.config, &bundle).await?;

    tracing::debug!(session_id = %session_id, count = entries.len(), "bucket listed");

    Ok(Json(ListResponse { entries }))
}

/// Fallback for unmatched paths under /api
pub async fn not_found() -> ServerError {
    ServerError::not_found("No such API endpoint")
}

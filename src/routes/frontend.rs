//! Server-rendered landing page.

use crate::error::{Result, ServerError};
use crate::session::SessionId;
use crate::state::AppState;
use axum::extract::State;
use axum::response::Html;
use axum::Extension;
use std::sync::Arc;

const PAGE_MESSAGE: &str = "Web-identity federation demo";

/// GET /
///
/// Renders the landing page with the session's authenticated flag. The
/// listing button is wired up by the static script.
pub async fn home(
    State(state): State<Arc<AppState>>,
    Extension(SessionId(session_id)): Extension<SessionId>,
) -> Result<Html<String>> {
    let session = state
        .sessions
        .load(&session_id)
        .await?
        .ok_or_else(|| ServerError::internal("session disappeared mid-request"))?;

    let status = if session.is_authenticated {
        r#"<p>You are logged in.</p>
    <button id="list-button">List bucket</button>
    <ul id="entries"></ul>"#
    } else {
        r#"<p>You are not logged in.</p>
    <p><a href="/auth/gg/flow">Login with Google</a></p>"#
    };

    Ok(Html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{title}</title>
</head>
<body>
  <h1>{title}</h1>
  {status}
  <script src="/scripts/app.js"></script>
</body>
</html>
"#,
        title = PAGE_MESSAGE,
        status = status,
    )))
}

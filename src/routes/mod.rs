//! HTTP route handlers and router configuration

mod api;
mod auth;
mod frontend;

use crate::session;
use crate::state::AppState;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Build the main application router
pub fn build_router(state: Arc<AppState>) -> Router {
    // Protected listing API; anything else under /api is a 404
    let api_routes = Router::new()
        .route("/s3/list", get(api::s3_list))
        .fallback(api::not_found);

    // OAuth flow initiation and provider callback
    let auth_routes = Router::new()
        .route("/gg/flow", get(auth::flow))
        .route("/gg/redirect", get(auth::redirect));

    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route("/", get(frontend::home))
        .nest("/api", api_routes)
        .nest("/auth", auth_routes)
        // Static assets at the web root for anything unmatched
        .fallback_service(ServeDir::new(static_dir))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::ensure_session,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 302 redirect (axum's helpers emit 303/307; the browser contract here is a
/// plain Found).
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)], "").into_response()
}

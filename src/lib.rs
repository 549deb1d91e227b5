//! webid-demo HTTP server
//!
//! A small demonstration server that logs a user in with Google's OAuth2 /
//! OpenID Connect authorization-code flow, trades the resulting identity
//! token for temporary AWS credentials through STS
//! `AssumeRoleWithWebIdentity`, and lists an S3 bucket with them. All state
//! lives in a cookie-keyed, in-memory session.
//!
//! # Example
//!
//! ```ignore
//! use webid_demo::{DemoServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig::default();
//!     let server = DemoServer::new(config).unwrap();
//!     server.run().await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod federation;
pub mod oauth;
pub mod routes;
pub mod session;
pub mod state;
pub mod storage;
pub mod telemetry;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use session::{MemorySessionStore, Session, SessionStore};
pub use state::AppState;
pub use telemetry::{init_logging, TelemetryConfig};

use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Demo HTTP server
pub struct DemoServer {
    /// Application state
    state: Arc<AppState>,
    /// Configured router
    router: Router,
}

impl DemoServer {
    /// Create a new server with the given configuration
    pub fn new(config: ServerConfig) -> Result<Self> {
        let state = Arc::new(AppState::new(config)?);
        let router = routes::build_router(state.clone());

        Ok(Self { state, router })
    }

    /// Get a reference to the application state
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Get the router for testing
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let addr = self.state.config.listen_addr();
        let listener = TcpListener::bind(addr).await?;

        info!(
            addr = %addr,
            base_url = %self.state.config.resolved_base_url(),
            bucket = %self.state.config.s3_bucket,
            "webid-demo server starting"
        );

        axum::serve(listener, self.router).await
    }
}

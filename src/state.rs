//! Application state shared across handlers.

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::federation;
use crate::oauth::GoogleOAuthClient;
use crate::session::{MemorySessionStore, SessionStore};
use std::sync::Arc;

/// Shared server state: configuration plus the clients and the session store.
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,
    /// Session store (in-memory reference backend by default)
    pub sessions: Arc<dyn SessionStore>,
    /// Google OAuth client
    pub oauth: GoogleOAuthClient,
    /// STS client for the web-identity exchange
    pub sts: aws_sdk_sts::Client,
}

impl AppState {
    /// Create state with the default in-memory session store.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        Self::with_session_store(config, Arc::new(MemorySessionStore::new()))
    }

    /// Create state with an explicit session store backend.
    pub fn with_session_store(
        config: ServerConfig,
        sessions: Arc<dyn SessionStore>,
    ) -> Result<Self, ServerError> {
        let oauth = GoogleOAuthClient::new(&config)?;
        let sts = federation::build_sts_client(&config);

        Ok(Self {
            config,
            sessions,
            oauth,
            sts,
        })
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("oauth", &self.oauth)
            .finish_non_exhaustive()
    }
}

//! Google OAuth2 authorization-code flow client.
//!
//! The endpoint set is fixed (no discovery document) and the returned id
//! token is NOT cryptographically validated before use, matching the
//! original Node implementation of this demo.

use crate::config::ServerConfig;
use crate::error::ServerError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Fixed scope requested from the identity provider.
pub const OAUTH_SCOPE: &str = "openid email";

/// Timeout for token-endpoint calls (connect + response).
const TOKEN_EXCHANGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Tokens returned by the authorization-code exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// OAuth access token
    pub access_token: String,
    /// OIDC identity token (unverified JWT)
    pub id_token: String,
    /// Validity window in seconds, informational only
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Usually "Bearer"
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Client for the Google authorization-code flow.
pub struct GoogleOAuthClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    auth_endpoint: String,
    token_endpoint: String,
    redirect_uri: String,
}

impl GoogleOAuthClient {
    /// Build the client from server configuration.
    pub fn new(config: &ServerConfig) -> Result<Self, ServerError> {
        let http = reqwest::Client::builder()
            .timeout(TOKEN_EXCHANGE_TIMEOUT)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| ServerError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            auth_endpoint: config.google_auth_endpoint.clone(),
            token_endpoint: config.google_token_endpoint.clone(),
            redirect_uri: config.redirect_uri(),
        })
    }

    /// Compose the authorization URL the browser is redirected to.
    ///
    /// `state_token` ties the eventual callback to this request.
    pub fn authorize_url(&self, state_token: &str) -> Result<String, ServerError> {
        let mut url = Url::parse(&self.auth_endpoint)
            .map_err(|e| ServerError::internal(format!("Invalid auth endpoint: {}", e)))?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("state", state_token)
            .append_pair("scope", OAUTH_SCOPE);

        Ok(url.into())
    }

    /// Exchange an authorization code for tokens at the token endpoint.
    ///
    /// One-shot: no retry, transport defaults beyond the client timeout.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, ServerError> {
        let params = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .http
            .post(&self.token_endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| ServerError::TokenExchange(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ServerError::TokenExchange(format!(
                "token endpoint returned HTTP {}: {}",
                status, body
            )));
        }

        let tokens: TokenResponse = response
            .json()
            .await
            .map_err(|e| ServerError::TokenExchange(format!("invalid token response: {}", e)))?;

        Ok(tokens)
    }
}

impl std::fmt::Debug for GoogleOAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleOAuthClient")
            .field("client_id", &self.client_id)
            .field("auth_endpoint", &self.auth_endpoint)
            .field("token_endpoint", &self.token_endpoint)
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

/// Minimal id-token claims peeked for logging.
#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

/// Decode the id token's payload WITHOUT verifying its signature.
///
/// Used only to log who logged in; nothing security-relevant may depend on
/// the returned values.
pub fn unverified_subject(id_token: &str) -> Option<(String, Option<String>)> {
    let payload = id_token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.as_bytes()).ok()?;
    let claims: IdTokenClaims = serde_json::from_slice(&bytes).ok()?;
    claims.sub.map(|sub| (sub, claims.email))
}

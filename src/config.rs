//! Server configuration

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default Google authorization endpoint.
///
/// In real life we would use the discovery document; provider discovery is
/// out of scope here, so the endpoint set is fixed.
pub const GOOGLE_AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Default Google token endpoint for the authorization-code exchange.
pub const GOOGLE_TOKEN_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v4/token";

/// Server configuration, parsed from CLI arguments with env fallbacks.
#[derive(Debug, Clone, Parser)]
#[command(name = "webid-demo", version, about = "OIDC login + AWS web-identity federation demo")]
pub struct ServerConfig {
    /// A port to bind to
    #[arg(short = 'P', long, env = "WEBID_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Publicly routable hostname of the app, needed for OAuth redirect URLs.
    /// A literal `$port` is substituted with the actual port at startup.
    #[arg(
        short = 'H',
        long,
        alias = "base_url",
        env = "WEBID_BASE_URL",
        default_value = "localhost:$port"
    )]
    pub base_url: String,

    /// Google OAuth client id
    #[arg(long, env = "WEBID_GOOGLE_CLIENT_ID", default_value = "")]
    pub google_client_id: String,

    /// Google OAuth client secret
    #[arg(
        long,
        env = "WEBID_GOOGLE_CLIENT_SECRET",
        default_value = "",
        hide_env_values = true
    )]
    pub google_client_secret: String,

    /// AWS region used for the federated credentials and the bucket
    #[arg(long, env = "WEBID_AWS_REGION", default_value = "us-east-1")]
    pub aws_region: String,

    /// S3 bucket to list
    #[arg(long, env = "WEBID_S3_BUCKET", default_value = "")]
    pub s3_bucket: String,

    /// IAM role ARN trusted for web-identity federation
    #[arg(long, env = "WEBID_ROLE_ARN", default_value = "")]
    pub role_arn: String,

    /// Session name recorded on the assumed role
    #[arg(long, env = "WEBID_ROLE_SESSION_NAME", default_value = "webid-demo")]
    pub role_session_name: String,

    /// Directory of static assets served at the web root
    #[arg(long, env = "WEBID_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Google authorization endpoint override (testing)
    #[arg(long, env = "WEBID_GOOGLE_AUTH_ENDPOINT", default_value = GOOGLE_AUTH_ENDPOINT)]
    pub google_auth_endpoint: String,

    /// Google token endpoint override (testing)
    #[arg(long, env = "WEBID_GOOGLE_TOKEN_ENDPOINT", default_value = GOOGLE_TOKEN_ENDPOINT)]
    pub google_token_endpoint: String,

    /// STS endpoint override (e.g. LocalStack)
    #[arg(long, env = "WEBID_STS_ENDPOINT")]
    pub sts_endpoint: Option<String>,

    /// S3 endpoint override (e.g. LocalStack/MinIO)
    #[arg(long, env = "WEBID_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// Fallback log level when RUST_LOG is not set
    #[arg(long, env = "WEBID_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            base_url: "localhost:$port".to_string(),
            google_client_id: String::new(),
            google_client_secret: String::new(),
            aws_region: "us-east-1".to_string(),
            s3_bucket: String::new(),
            role_arn: String::new(),
            role_session_name: "webid-demo".to_string(),
            static_dir: PathBuf::from("static"),
            google_auth_endpoint: GOOGLE_AUTH_ENDPOINT.to_string(),
            google_token_endpoint: GOOGLE_TOKEN_ENDPOINT.to_string(),
            sts_endpoint: None,
            s3_endpoint: None,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Create config from CLI args
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Address to bind the listener to
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// Base URL with the `$port` placeholder resolved
    pub fn resolved_base_url(&self) -> String {
        self.base_url.replace("$port", &self.port.to_string())
    }

    /// The OAuth redirect URI registered with the identity provider
    pub fn redirect_uri(&self) -> String {
        format!("http://{}/auth/gg/redirect", self.resolved_base_url())
    }

    /// Validate configuration at startup
    pub fn validate(&self) -> Result<(), String> {
        if self.google_client_id.is_empty() {
            return Err(
                "google_client_id is required (--google-client-id or WEBID_GOOGLE_CLIENT_ID)"
                    .to_string(),
            );
        }
        if self.google_client_secret.is_empty() {
            return Err(
                "google_client_secret is required (--google-client-secret or \
                 WEBID_GOOGLE_CLIENT_SECRET)"
                    .to_string(),
            );
        }
        if self.s3_bucket.is_empty() {
            return Err("s3_bucket is required (--s3-bucket or WEBID_S3_BUCKET)".to_string());
        }
        if self.role_arn.is_empty() {
            return Err("role_arn is required (--role-arn or WEBID_ROLE_ARN)".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_substitution_in_base_url() {
        let config = ServerConfig {
            port: 9090,
            ..Default::default()
        };
        assert_eq!(config.resolved_base_url(), "localhost:9090");
        assert_eq!(
            config.redirect_uri(),
            "http://localhost:9090/auth/gg/redirect"
        );
    }

    #[test]
    fn test_explicit_base_url_left_untouched() {
        let config = ServerConfig {
            port: 8080,
            base_url: "demo.example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolved_base_url(), "demo.example.com");
    }

    #[test]
    fn test_validate_requires_secrets() {
        let config = ServerConfig::default();
        assert!(config.validate().is_err());

        let config = ServerConfig {
            google_client_id: "id".to_string(),
            google_client_secret: "secret".to_string(),
            s3_bucket: "bucket".to_string(),
            role_arn: "arn:aws:iam::123456789012:role/demo".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_listen_addr_uses_port() {
        let config = ServerConfig {
            port: 1234,
            ..Default::default()
        };
        assert_eq!(config.listen_addr().port(), 1234);
    }
}

//! Web-identity federation: trading the session's id token for temporary
//! AWS credentials via STS `AssumeRoleWithWebIdentity`.
//!
//! The exchange is unsigned (no AWS credentials are needed to call it), so
//! the STS client is built from explicit configuration rather than the
//! default provider chain. Results are cached in the session and reused
//! without any freshness check against the stated validity window.

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::state::AppState;
use aws_sdk_sts::config::{BehaviorVersion, Region};

/// Requested validity of the federated credentials, in seconds.
pub const FEDERATION_DURATION_SECS: i32 = 3600;

/// Federated credential bundle cached per session.
#[derive(Clone, PartialEq, Eq)]
pub struct AwsCredentialBundle {
    /// Temporary access key id
    pub access_key_id: String,
    /// Temporary secret key
    pub secret_access_key: String,
    /// STS session token accompanying the temporary key pair
    pub session_token: String,
    /// Region the bundle is scoped to
    pub region: String,
}

impl std::fmt::Debug for AwsCredentialBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsCredentialBundle")
            .field("access_key_id", &self.access_key_id)
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

/// Build the STS client, honoring an endpoint override for local testing.
pub fn build_sts_client(config: &ServerConfig) -> aws_sdk_sts::Client {
    let mut builder = aws_sdk_sts::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(config.aws_region.clone()));

    if let Some(endpoint) = &config.sts_endpoint {
        builder = builder.endpoint_url(endpoint);
    }

    aws_sdk_sts::Client::from_conf(builder.build())
}

/// Exchange an identity token for a credential bundle.
///
/// One-shot: no retry beyond SDK transport defaults.
pub async fn assume_role_with_web_identity(
    sts: &aws_sdk_sts::Client,
    config: &ServerConfig,
    id_token: &str,
) -> Result<AwsCredentialBundle, ServerError> {
    let output = sts
        .assume_role_with_web_identity()
        .role_arn(&config.role_arn)
        .role_session_name(&config.role_session_name)
        .web_identity_token(id_token)
        .duration_seconds(FEDERATION_DURATION_SECS)
        .send()
        .await
        .map_err(map_sts_error)?;

    let credentials = output.credentials().ok_or_else(|| {
        ServerError::Federation("STS response carried no credentials".to_string())
    })?;

    Ok(AwsCredentialBundle {
        access_key_id: credentials.access_key_id().to_string(),
        secret_access_key: credentials.secret_access_key().to_string(),
        session_token: credentials.session_token().to_string(),
        region: config.aws_region.clone(),
    })
}

/// Resolve the credential bundle for a session, federating on first use.
///
/// Idempotent per session once cached: subsequent calls return the cached
/// bundle unchanged with no network traffic. Concurrent first-time calls may
/// both federate; the last write wins, which is acceptable for the expected
/// one-request-per-session usage.
pub async fn credentials_for_session(
    state: &AppState,
    session_id: &str,
) -> Result<AwsCredentialBundle, ServerError> {
    let mut session = state
        .sessions
        .load(session_id)
        .await?
        .ok_or_else(|| ServerError::internal("session disappeared mid-request"))?;

    if let Some(bundle) = session.aws_credentials {
        tracing::debug!(session_id, "reusing cached federated credentials");
        return Ok(bundle);
    }

    let id_token = session
        .id_token
        .clone()
        .ok_or_else(|| ServerError::Federation("session holds no identity token".to_string()))?;

    let bundle = assume_role_with_web_identity(&state.sts, &state.config, &id_token).await?;

    tracing::info!(
        session_id,
        access_key_id = %bundle.access_key_id,
        region = %bundle.region,
        "federated credentials issued"
    );

    session.aws_credentials = Some(bundle.clone());
    state.sessions.save(session_id, session).await?;

    Ok(bundle)
}

/// Map an STS SDK error, classifying transport failures distinctly in the
/// message while keeping the single client-visible failure path.
fn map_sts_error<E: std::fmt::Debug>(err: aws_sdk_sts::error::SdkError<E>) -> ServerError {
    use aws_sdk_sts::error::SdkError;

    match &err {
        SdkError::ServiceError(service_err) => {
            let status = service_err.raw().status().as_u16();
            ServerError::Federation(format!("STS error (HTTP {}): {:?}", status, err))
        }
        SdkError::TimeoutError(_) => ServerError::Federation(format!("STS timeout: {:?}", err)),
        SdkError::DispatchFailure(_) => {
            ServerError::Federation(format!("STS connection error: {:?}", err))
        }
        _ => ServerError::Federation(format!("STS error: {:?}", err)),
    }
}

//! S3 object listing with session-scoped federated credentials.

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::federation::AwsCredentialBundle;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};

/// Build an S3 client scoped to one session's credential bundle.
///
/// A fresh client per request: the bundle decides the signing identity, so
/// clients cannot be shared across sessions.
fn build_s3_client(config: &ServerConfig, bundle: &AwsCredentialBundle) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        bundle.access_key_id.clone(),
        bundle.secret_access_key.clone(),
        Some(bundle.session_token.clone()),
        None,
        "webid-federation",
    );

    let mut builder = aws_sdk_s3::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(bundle.region.clone()))
        .credentials_provider(credentials);

    if let Some(endpoint) = &config.s3_endpoint {
        builder = builder.endpoint_url(endpoint).force_path_style(true);
    }

    aws_sdk_s3::Client::from_conf(builder.build())
}

/// List object keys in the configured bucket, preserving provider order.
///
/// Only the first page is surfaced; larger buckets are silently truncated.
pub async fn list_bucket(
    config: &ServerConfig,
    bundle: &AwsCredentialBundle,
) -> Result<Vec<String>, ServerError> {
    let client = build_s3_client(config, bundle);

    let response = client
        .list_objects_v2()
        .bucket(&config.s3_bucket)
        .send()
        .await
        .map_err(|e| map_s3_error(e, &config.s3_bucket))?;

    let keys = response
        .contents()
        .iter()
        .filter_map(|obj| obj.key().map(str::to_string))
        .collect();

    Ok(keys)
}

/// Map an S3 SDK error to the single storage failure path.
fn map_s3_error<E: std::fmt::Debug>(err: aws_sdk_s3::error::SdkError<E>, bucket: &str) -> ServerError {
    use aws_sdk_s3::error::SdkError;

    match &err {
        SdkError::ServiceError(service_err) => {
            let status = service_err.raw().status().as_u16();
            match status {
                403 => ServerError::Storage(format!(
                    "access denied for bucket '{}': {:?}",
                    bucket, err
                )),
                404 => ServerError::Storage(format!("bucket '{}' not found: {:?}", bucket, err)),
                _ => ServerError::Storage(format!(
                    "S3 error for bucket '{}' (HTTP {}): {:?}",
                    bucket, status, err
                )),
            }
        }
        SdkError::TimeoutError(_) => {
            ServerError::Storage(format!("S3 timeout for bucket '{}': {:?}", bucket, err))
        }
        SdkError::DispatchFailure(_) => ServerError::Storage(format!(
            "S3 connection error for bucket '{}': {:?}",
            bucket, err
        )),
        _ => ServerError::Storage(format!("S3 error for bucket '{}': {:?}", bucket, err)),
    }
}

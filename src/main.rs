use webid_demo::{init_logging, DemoServer, ServerConfig, TelemetryConfig};

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_args();

    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    }

    let telemetry = TelemetryConfig::with_server_config(&config);
    init_logging(&telemetry);

    tracing::info!(
        port = config.port,
        base_url = %config.resolved_base_url(),
        region = %config.aws_region,
        bucket = %config.s3_bucket,
        role_arn = %config.role_arn,
        "starting webid-demo"
    );

    let server = match DemoServer::new(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "failed to initialize server");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        tracing::error!(error = %e, "server exited with error");
        std::process::exit(1);
    }
}

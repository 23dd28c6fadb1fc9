//! Machine failure prediction service
//!
//! Loads the preprocessing spec and both classifiers once at startup,
//! then serves predictions over HTTP. A failed artifact load aborts
//! the process.

use anyhow::Result;
use predict_server::{api, config::ServerConfig};
use predictor_lib::{
    artifacts::ArtifactBundle,
    health::{components, ComponentHealth, HealthRegistry},
    observability::{ServiceMetrics, StructuredLogger},
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting predict-server");

    // Load configuration
    let config = ServerConfig::load()?;
    info!(port = config.api_port, "Server configured");

    // Load model artifacts; the service cannot run without them
    let bundle = ArtifactBundle::load(&config.artifact_paths())?;
    let pipeline = bundle.pipeline();

    // Initialize health registry
    let health_registry = HealthRegistry::new();
    health_registry
        .update(
            components::ARTIFACTS,
            ComponentHealth::healthy_with(format!(
                "{} artifacts loaded, transform {}",
                bundle.manifest.len(),
                bundle.transform.version()
            )),
        )
        .await;
    health_registry.register(components::PIPELINE).await;
    health_registry.register(components::HTTP_API).await;

    // Initialize metrics
    let metrics = ServiceMetrics::new();
    for artifact in &bundle.manifest {
        metrics.set_artifact_info(artifact.name, &artifact.checksum);
    }

    // Initialize structured logger
    let logger = StructuredLogger::new("predict-server");
    logger.log_startup(SERVICE_VERSION, bundle.transform.version());

    // Create shared application state
    let app_state = Arc::new(api::AppState::new(
        pipeline,
        health_registry.clone(),
        metrics.clone(),
        logger.clone(),
    ));

    // Mark service as ready after initialization
    health_registry.set_ready(true).await;

    // Start the HTTP server
    let api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    logger.log_shutdown("SIGINT received");
    api_handle.abort();
    info!("Shutting down");

    Ok(())
}

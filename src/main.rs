//! Cube Gateway Server
//!
//! Run with: cargo run --bin cube-gateway
//!
//! # Configuration
//!
//! Read from `config.toml` (see `cube-gateway-cli config`) and environment:
//! - `CUBE_API_URL`: Cube REST API base URL (default: http://cube:4000/cubejs-api/v1)
//! - `CUBE_API_SECRET`: Cube API token (optional)
//! - `CUBE_GATEWAY_HOST`: Host to bind to (default: 0.0.0.0)
//! - `CUBE_GATEWAY_PORT`: Port to listen on (default: 3333)
//! - `CUBE_GATEWAY_PROBE_CONCURRENCY`: Sample-value probes in flight (default: 4)
//! - `RUST_LOG`: Log filter (overrides `CUBE_GATEWAY_LOG_LEVEL`)

use clap::Parser;
use cube_gateway::api::{serve, AppState};
use cube_gateway::config::Config;
use cube_gateway::cube::{AnalyticsBackend, CubeClient};
use cube_gateway::semantic::Gateway;
use cube_gateway::telemetry::init_tracing;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "cube-gateway")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Analytics gateway over a Cube semantic layer")]
struct Args {
    /// Config file (default: search standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    init_tracing(&config.logging);

    tracing::info!("Starting Cube gateway v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        cube_url = %config.cube.url,
        authenticated = config.cube.api_secret.is_some(),
        probe_concurrency = config.metadata.probe_concurrency,
        "Cube backend configured"
    );

    let client = Arc::new(CubeClient::new(config.cube.client_config())?);

    // Check Cube availability; the gateway still starts without it
    match client.get_meta().await {
        Ok(meta) => tracing::info!("Cube connection verified ({} cubes)", meta.cubes.len()),
        Err(e) => tracing::warn!("Cube not available: {} (discovery will report errors)", e),
    }

    let gateway = Arc::new(Gateway::new(client, config.metadata.probe_concurrency));
    let api_config = config.server.api_config();

    serve(AppState::new(gateway, api_config.clone()), &api_config).await?;

    tracing::info!("Cube gateway stopped");
    Ok(())
}

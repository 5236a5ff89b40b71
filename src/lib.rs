//! # Cube Gateway
//!
//! Exposes a Cube semantic layer to calling agents through two tools:
//! schema discovery and ad-hoc query execution.
//!
//! ## Features
//!
//! - **Schema discovery**: cubes, measures, dimensions, and time dimensions
//! - **Sample values**: up to 10 observed values per string dimension, probed
//!   with bounded concurrency; a failed probe never fails discovery
//! - **Flat queries**: measures, dimensions, one time range, and a limit, without
//!   knowing Cube's query language
//!
//! ## Modules
//!
//! - [`cube`]: Cube REST API client and wire types
//! - [`semantic`]: Metadata enrichment, query building, and the gateway
//! - [`api`]: HTTP transport for the tools with Axum
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cube_gateway::cube::{CubeClient, CubeClientConfig};
//! use cube_gateway::semantic::{DiscoverResponse, Gateway};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(CubeClient::new(CubeClientConfig::default())?);
//!     let gateway = Gateway::new(client, 4);
//!
//!     match gateway.discover().await {
//!         DiscoverResponse::Cubes { cubes } => println!("Found {} cubes", cubes.len()),
//!         DiscoverResponse::Error { error } => eprintln!("Discovery failed: {}", error),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod cube;
pub mod semantic;
pub mod telemetry;

// Re-export top-level types for convenience
pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{Config, ConfigError, CubeConfig, LoggingConfig, MetadataConfig, ServerConfig};

pub use cube::{AnalyticsBackend, CubeClient, CubeClientConfig, CubeError, CubeResult, Query, Row};

pub use semantic::{
    CubeSchema, Dimension, DiscoverResponse, Gateway, GatewayError, GatewayResult, Measure,
    MetadataEnricher, QueryBuilder, QueryParams, TimeDimensionSummary,
};

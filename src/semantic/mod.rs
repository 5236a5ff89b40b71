//! Semantic Layer Gateway
//!
//! Translates between Cube's raw schema/query shapes and the shapes exposed
//! to calling agents:
//!
//! - **MetadataEnricher**: raw schema -> [`CubeSchema`]s with sample values
//! - **QueryBuilder**: flat tool arguments -> Cube [`Query`](crate::cube::Query)
//! - **Gateway**: the `get_cube_meta` and `run_cube_query` operations
//!
//! # Example
//!
//! ```rust,ignore
//! use cube_gateway::cube::{CubeClient, CubeClientConfig};
//! use cube_gateway::semantic::{Gateway, QueryParams};
//! use std::sync::Arc;
//!
//! let client = Arc::new(CubeClient::new(CubeClientConfig::default())?);
//! let gateway = Gateway::new(client, 4);
//!
//! let schema = gateway.discover().await;
//! let rows = gateway
//!     .query(&QueryParams {
//!         measures: vec!["orders.count".into()],
//!         ..Default::default()
//!     })
//!     .await?;
//! ```

mod builder;
mod enricher;
mod error;
mod gateway;
mod model;

#[cfg(test)]
pub(crate) mod fake;

pub use builder::{QueryBuilder, QueryParams};
pub use enricher::{MetadataEnricher, DEFAULT_PROBE_CONCURRENCY, SAMPLE_VALUE_LIMIT};
pub use error::{GatewayError, GatewayResult};
pub use gateway::Gateway;
pub use model::{CubeSchema, Dimension, DiscoverResponse, Measure, TimeDimensionSummary};

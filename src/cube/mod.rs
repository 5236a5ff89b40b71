//! Cube Backend
//!
//! Talks to the Cube semantic layer over its REST API.
//!
//! ## Endpoints
//!
//! - `GET {base_url}/meta` - schema description (cubes, measures, dimensions)
//! - `POST {base_url}/load` - execute a `{"query": {...}}` and return `{"data": [...]}`
//!
//! The [`AnalyticsBackend`] trait is the seam the rest of the crate depends on;
//! [`CubeClient`] is the reqwest implementation.

mod client;
mod error;
mod types;

pub use client::{AnalyticsBackend, CubeClient, CubeClientConfig};
pub use error::{CubeError, CubeResult};
pub use types::{
    DateRange, Query, RawCube, RawDimension, RawMeasure, RawQueryResult, RawSchema, Row,
    TimeDimension, STRING_TYPE, TIME_TYPE,
};

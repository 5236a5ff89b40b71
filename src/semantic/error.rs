//! Gateway error types

use thiserror::Error;

use crate::cube::CubeError;

/// Errors surfaced by the gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Caller-supplied parameters violate the query contract
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Backend call failed
    #[error(transparent)]
    Backend(#[from] CubeError),
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

//! Cube backend error types
//!
//! Every failure talking to the Cube REST API falls into one of three kinds.

use thiserror::Error;

/// Errors that can occur when talking to the Cube backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CubeError {
    /// Backend unreachable, timed out, or failing on its side (5xx)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Response could not be parsed into the expected shape
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Backend rejected the query itself (unknown member, bad date range, ...)
    #[error("Query error: {0}")]
    Query(String),
}

impl CubeError {
    /// Short machine-readable code for this error kind
    pub fn code(&self) -> &'static str {
        match self {
            CubeError::Connection(_) => "BACKEND_UNAVAILABLE",
            CubeError::Protocol(_) => "PROTOCOL_ERROR",
            CubeError::Query(_) => "QUERY_ERROR",
        }
    }
}

/// Result type for Cube backend operations
pub type CubeResult<T> = Result<T, CubeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CubeError::Query("Unknown measure: orders.nope".to_string());
        assert_eq!(err.to_string(), "Query error: Unknown measure: orders.nope");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CubeError::Connection(String::new()).code(), "BACKEND_UNAVAILABLE");
        assert_eq!(CubeError::Protocol(String::new()).code(), "PROTOCOL_ERROR");
        assert_eq!(CubeError::Query(String::new()).code(), "QUERY_ERROR");
    }
}

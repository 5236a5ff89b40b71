//! Data Transfer Objects
//!
//! Response types for the API endpoints that are not gateway types themselves.

use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: "healthy" or "degraded"
    pub status: String,
    /// Backend status: "ok" or "unreachable"
    pub backend: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Gateway version
    pub version: String,
}

/// Tool listing response
#[derive(Debug, Serialize)]
pub struct ToolListResponse {
    pub tools: Vec<ToolDescriptor>,
}

/// Description of a callable tool
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Vec<ToolParameter>,
}

/// A single tool parameter
#[derive(Debug, Clone, Serialize)]
pub struct ToolParameter {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub required: bool,
    pub description: &'static str,
}

//! Tool Routes
//!
//! The two tools exposed to calling agents.
//!
//! - GET /api/v1/tools - List tools and their parameters
//! - POST /api/v1/tools/get_cube_meta - Discover cubes with sample values
//! - POST /api/v1/tools/run_cube_query - Run a flat measures/dimensions query

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{ToolDescriptor, ToolListResponse, ToolParameter};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::cube::Row;
use crate::semantic::{DiscoverResponse, QueryParams};

/// GET /api/v1/tools
pub async fn list_tools() -> Json<ToolListResponse> {
    Json(ToolListResponse {
        tools: tool_descriptors(),
    })
}

/// POST /api/v1/tools/get_cube_meta
///
/// Always 200: a backend failure is reported as `{"error": "..."}`.
pub async fn get_cube_meta(State(state): State<Arc<AppState>>) -> Json<DiscoverResponse> {
    Json(state.gateway.discover().await)
}

/// POST /api/v1/tools/run_cube_query
pub async fn run_cube_query(
    State(state): State<Arc<AppState>>,
    Json(params): Json<QueryParams>,
) -> ApiResult<Json<Vec<Row>>> {
    let rows = state.gateway.query(&params).await?;
    Ok(Json(rows))
}

fn tool_descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: "get_cube_meta",
            description: "List cubes with their measures, dimensions (with sample values for \
                          string dimensions) and time dimensions.",
            parameters: Vec::new(),
        },
        ToolDescriptor {
            name: "run_cube_query",
            description: "Run an analytical query over cube measures and dimensions.",
            parameters: vec![
                ToolParameter {
                    name: "measures",
                    kind: "array<string>",
                    required: true,
                    description: "Measure names, at least one (e.g. \"orders.count\")",
                },
                ToolParameter {
                    name: "dimensions",
                    kind: "array<string>",
                    required: false,
                    description: "Dimension names to group by",
                },
                ToolParameter {
                    name: "time_dimension",
                    kind: "string",
                    required: false,
                    description: "Time dimension to filter on; requires date_range",
                },
                ToolParameter {
                    name: "date_range",
                    kind: "array<string>",
                    required: false,
                    description: "[start, end] dates; requires time_dimension",
                },
                ToolParameter {
                    name: "limit",
                    kind: "integer",
                    required: false,
                    description: "Maximum number of rows; omitted when zero",
                },
            ],
        },
    ]
}

//! Cube Gateway REST API
//!
//! HTTP transport for the gateway tools, built with Axum.
//!
//! # Endpoints
//!
//! ## Tools
//! - `GET /api/v1/tools` - List the available tools
//! - `POST /api/v1/tools/get_cube_meta` - Schema discovery with sample values
//! - `POST /api/v1/tools/run_cube_query` - Execute a query
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe (Cube reachable)
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use cube_gateway::api::{serve, ApiConfig, AppState};
//! use cube_gateway::cube::{CubeClient, CubeClientConfig};
//! use cube_gateway::semantic::Gateway;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(CubeClient::new(CubeClientConfig::default())?);
//!     let gateway = Arc::new(Gateway::new(client, 4));
//!     let config = ApiConfig::default();
//!
//!     serve(AppState::new(gateway, config.clone()), &config).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/tools", get(routes::tools::list_tools))
        .route("/tools/get_cube_meta", post(routes::tools::get_cube_meta))
        .route("/tools/run_cube_query", post(routes::tools::run_cube_query))
        .layer(DefaultBodyLimit::max(state.config.max_body_size));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Cube gateway listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Cube gateway shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::{CubeError, RawQueryResult};
    use crate::semantic::fake::{rows, sample_meta, FakeBackend};
    use crate::semantic::Gateway;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn create_test_app(backend: FakeBackend) -> Router {
        let gateway = Arc::new(Gateway::new(Arc::new(backend), 2));
        build_router(AppState::new(gateway, ApiConfig::default()))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let app = create_test_app(FakeBackend::new(sample_meta()));

        let response = app
            .oneshot(Request::builder().uri("/health/live").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready_backend_down() {
        let app = create_test_app(FakeBackend::with_meta(Err(CubeError::Connection(
            "refused".to_string(),
        ))));

        let response = app
            .oneshot(Request::builder().uri("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_health_full() {
        let app = create_test_app(FakeBackend::new(sample_meta()));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["backend"], "ok");
    }

    #[tokio::test]
    async fn test_list_tools() {
        let app = create_test_app(FakeBackend::new(sample_meta()));

        let response = app
            .oneshot(Request::builder().uri("/api/v1/tools").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["tools"][1]["name"], "run_cube_query");
    }

    #[tokio::test]
    async fn test_get_cube_meta() {
        let backend = FakeBackend::new(sample_meta())
            .probe("orders.status", Ok(rows("orders.status", &[json!("shipped")])));
        let app = create_test_app(backend);

        let response = app
            .oneshot(post_json("/api/v1/tools/get_cube_meta", "{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["cubes"][0]["dimensions"][0]["sample_values"], json!(["shipped"]));
        assert_eq!(
            body["cubes"][0]["timeDimensions"],
            json!([{"name": "orders.created_at", "title": "Created at"}])
        );
    }

    #[tokio::test]
    async fn test_get_cube_meta_backend_down_is_payload() {
        let app = create_test_app(FakeBackend::with_meta(Err(CubeError::Connection(
            "refused".to_string(),
        ))));

        let response = app
            .oneshot(post_json("/api/v1/tools/get_cube_meta", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Connection error: refused"})
        );
    }

    #[tokio::test]
    async fn test_run_cube_query() {
        let backend = FakeBackend::new(sample_meta())
            .query_result(Ok(rows("orders.country", &[json!("US")])));
        let app = create_test_app(backend);

        let response = app
            .oneshot(post_json(
                "/api/v1/tools/run_cube_query",
                r#"{"measures": ["orders.count"], "dimensions": ["orders.country"], "limit": 0}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([{"orders.country": "US"}]));
    }

    #[tokio::test]
    async fn test_run_cube_query_no_data() {
        let backend = FakeBackend::new(sample_meta()).query_result(Ok(RawQueryResult::default()));
        let app = create_test_app(backend);

        let response = app
            .oneshot(post_json(
                "/api/v1/tools/run_cube_query",
                r#"{"measures": ["orders.count"]}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_run_cube_query_empty_measures() {
        let app = create_test_app(FakeBackend::new(sample_meta()));

        let response = app
            .oneshot(post_json("/api/v1/tools/run_cube_query", r#"{"measures": []}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "INVALID_ARGUMENT");
    }

    #[tokio::test]
    async fn test_run_cube_query_backend_rejects() {
        let backend = FakeBackend::new(sample_meta())
            .query_result(Err(CubeError::Query("Unknown measure".to_string())));
        let app = create_test_app(backend);

        let response = app
            .oneshot(post_json(
                "/api/v1/tools/run_cube_query",
                r#"{"measures": ["orders.nope"]}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "QUERY_ERROR");
        assert_eq!(body["error"]["message"], "Query error: Unknown measure");
    }

    #[tokio::test]
    async fn test_run_cube_query_backend_down() {
        let backend = FakeBackend::new(sample_meta())
            .query_result(Err(CubeError::Connection("refused".to_string())));
        let app = create_test_app(backend);

        let response = app
            .oneshot(post_json(
                "/api/v1/tools/run_cube_query",
                r#"{"measures": ["orders.count"]}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_run_cube_query_invalid_json() {
        let app = create_test_app(FakeBackend::new(sample_meta()));

        let response = app
            .oneshot(post_json("/api/v1/tools/run_cube_query", "not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

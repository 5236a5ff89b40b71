//! Gateway
//!
//! The two public operations: schema discovery and query execution.
//!
//! `discover` always produces a value: backend failures come back as an
//! `{"error": ...}` payload so the caller can branch on it. `query` returns
//! its failures as [`GatewayError`] for the transport layer to report.

use std::sync::Arc;

use crate::cube::{AnalyticsBackend, Row};
use crate::semantic::builder::QueryParams;
use crate::semantic::enricher::MetadataEnricher;
use crate::semantic::error::GatewayResult;
use crate::semantic::model::DiscoverResponse;

/// Orchestrates the backend client, enricher, and query builder
pub struct Gateway {
    backend: Arc<dyn AnalyticsBackend>,
    enricher: MetadataEnricher,
}

impl Gateway {
    /// Create a gateway over the given backend
    pub fn new(backend: Arc<dyn AnalyticsBackend>, probe_concurrency: usize) -> Self {
        let enricher = MetadataEnricher::new(Arc::clone(&backend), probe_concurrency);
        Self { backend, enricher }
    }

    /// Discover cubes, measures, and dimensions with sample values
    pub async fn discover(&self) -> DiscoverResponse {
        tracing::info!("get_cube_meta called");

        let raw = match self.backend.get_meta().await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch Cube metadata");
                return DiscoverResponse::Error {
                    error: e.to_string(),
                };
            }
        };

        let cubes = self.enricher.enrich(raw).await;
        tracing::info!(cubes = cubes.len(), "Cube metadata discovered");

        DiscoverResponse::Cubes { cubes }
    }

    /// Run an ad-hoc query and return its rows
    pub async fn query(&self, params: &QueryParams) -> GatewayResult<Vec<Row>> {
        tracing::info!(
            measures = ?params.measures,
            dimensions = ?params.dimensions,
            time_dimension = ?params.time_dimension,
            date_range = ?params.date_range,
            limit = ?params.limit,
            "run_cube_query called"
        );

        let query = params.build()?;
        let rows = self.backend.run_query(&query).await?.into_rows();

        tracing::debug!(rows = rows.len(), "Query returned");
        Ok(rows)
    }

    /// Check that the backend answers `/meta`
    pub async fn backend_ready(&self) -> bool {
        self.backend.get_meta().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::{CubeError, Query, RawQueryResult};
    use crate::semantic::error::GatewayError;
    use crate::semantic::fake::{rows, sample_meta, FakeBackend};
    use serde_json::json;

    fn gateway(backend: FakeBackend) -> (Gateway, Arc<FakeBackend>) {
        let backend = Arc::new(backend);
        (Gateway::new(backend.clone(), 2), backend)
    }

    fn params(measures: &[&str]) -> QueryParams {
        QueryParams {
            measures: measures.iter().map(|m| m.to_string()).collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_discover_returns_enriched_cubes() {
        let backend = FakeBackend::new(sample_meta())
            .probe("users.plan", Ok(rows("users.plan", &[json!("free"), json!("pro")])));
        let (gateway, _) = gateway(backend);

        let response = gateway.discover().await;

        let DiscoverResponse::Cubes { cubes } = response else {
            panic!("expected cubes");
        };
        assert_eq!(cubes.len(), 2);
        assert_eq!(cubes[1].dimensions[0].sample_values, vec![json!("free"), json!("pro")]);
    }

    #[tokio::test]
    async fn test_discover_connection_error_becomes_payload() {
        let backend = FakeBackend::with_meta(Err(CubeError::Connection("Cube unreachable".to_string())));
        let (gateway, backend) = gateway(backend);

        let response = gateway.discover().await;

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"error": "Connection error: Cube unreachable"})
        );
        assert!(backend.queries().is_empty());
    }

    #[tokio::test]
    async fn test_discover_protocol_error_becomes_payload() {
        let backend = FakeBackend::with_meta(Err(CubeError::Protocol("malformed".to_string())));
        let (gateway, _) = gateway(backend);

        assert!(gateway.discover().await.is_error());
    }

    #[tokio::test]
    async fn test_query_returns_data() {
        let backend = FakeBackend::new(sample_meta())
            .query_result(Ok(rows("country", &[json!("US")])));
        let (gateway, backend) = gateway(backend);

        let result = gateway.query(&params(&["orders.count"])).await.unwrap();

        assert_eq!(serde_json::to_value(&result).unwrap(), json!([{"country": "US"}]));
        assert_eq!(
            backend.queries(),
            vec![Query {
                measures: vec!["orders.count".to_string()],
                ..Default::default()
            }]
        );
    }

    #[tokio::test]
    async fn test_query_without_data_returns_empty() {
        let backend = FakeBackend::new(sample_meta()).query_result(Ok(RawQueryResult::default()));
        let (gateway, _) = gateway(backend);

        let result = gateway.query(&params(&["orders.count"])).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_query_invalid_arguments_propagate() {
        let (gateway, backend) = gateway(FakeBackend::new(sample_meta()));

        let err = gateway.query(&params(&[])).await.unwrap_err();

        assert!(matches!(err, GatewayError::InvalidArgument(_)));
        assert!(backend.queries().is_empty());
    }

    #[tokio::test]
    async fn test_query_backend_errors_propagate() {
        let backend = FakeBackend::new(sample_meta())
            .query_result(Err(CubeError::Query("Unknown measure".to_string())));
        let (gateway, _) = gateway(backend);

        let err = gateway.query(&params(&["orders.nope"])).await.unwrap_err();
        assert_eq!(
            err,
            GatewayError::Backend(CubeError::Query("Unknown measure".to_string()))
        );
    }

    #[tokio::test]
    async fn test_backend_ready() {
        let (up, _) = gateway(FakeBackend::new(sample_meta()));
        let (down, _) = gateway(FakeBackend::with_meta(Err(CubeError::Connection("down".to_string()))));

        assert!(up.backend_ready().await);
        assert!(!down.backend_ready().await);
    }
}

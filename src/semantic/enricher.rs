//! Metadata Enricher
//!
//! Converts the raw Cube schema into the client-facing shape and attaches
//! sample values to string dimensions.
//!
//! Each string dimension costs one extra `/load` round trip. The probes are
//! independent, so they run as a bounded batch (`probe_concurrency` at a time);
//! a concurrency of 1 runs them sequentially. A failed probe only empties that
//! dimension's sample values.

use futures_util::stream::{self, StreamExt};
use serde_json::Value;
use std::sync::Arc;

use crate::cube::{AnalyticsBackend, Query, RawCube, RawDimension, RawSchema, Row, STRING_TYPE};
use crate::semantic::model::{CubeSchema, Dimension, Measure};

/// Maximum number of sample values attached to a dimension
pub const SAMPLE_VALUE_LIMIT: u32 = 10;

/// Default number of sample-value probes in flight at once
pub const DEFAULT_PROBE_CONCURRENCY: usize = 4;

/// Builds [`CubeSchema`]s from a raw backend schema
pub struct MetadataEnricher {
    backend: Arc<dyn AnalyticsBackend>,
    probe_concurrency: usize,
}

impl MetadataEnricher {
    /// Create a new enricher; a concurrency of 0 is treated as 1
    pub fn new(backend: Arc<dyn AnalyticsBackend>, probe_concurrency: usize) -> Self {
        Self {
            backend,
            probe_concurrency: probe_concurrency.max(1),
        }
    }

    /// Enrich every cube, preserving backend order
    pub async fn enrich(&self, raw: RawSchema) -> Vec<CubeSchema> {
        let mut cubes = Vec::with_capacity(raw.cubes.len());
        for cube in raw.cubes {
            cubes.push(self.enrich_cube(cube).await);
        }
        cubes
    }

    async fn enrich_cube(&self, cube: RawCube) -> CubeSchema {
        let cube_name = cube.name;

        // `buffered` keeps output in dimension order
        let dimensions = stream::iter(cube.dimensions)
            .map(|raw| self.enrich_dimension(&cube_name, raw))
            .buffered(self.probe_concurrency)
            .collect::<Vec<_>>()
            .await;

        tracing::debug!(
            cube = %cube_name,
            measures = cube.measures.len(),
            dimensions = dimensions.len(),
            "Enriched cube"
        );

        CubeSchema {
            name: cube_name,
            title: cube.title,
            description: cube.description,
            measures: cube.measures.into_iter().map(Measure::from).collect(),
            dimensions,
        }
    }

    async fn enrich_dimension(&self, cube: &str, raw: RawDimension) -> Dimension {
        let sample_values = if raw.kind == STRING_TYPE {
            self.sample_values(cube, &raw.name).await
        } else {
            Vec::new()
        };

        Dimension {
            name: raw.name,
            title: raw.title,
            description: raw.description,
            kind: raw.kind,
            sample_values,
        }
    }

    /// Probe a single dimension; any failure yields no samples
    async fn sample_values(&self, cube: &str, dimension: &str) -> Vec<Value> {
        let probe = Query::probe(dimension, SAMPLE_VALUE_LIMIT);

        match self.backend.run_query(&probe).await {
            Ok(result) => distinct_values(dimension, result.into_rows()),
            Err(e) => {
                tracing::warn!(
                    cube = %cube,
                    dimension = %dimension,
                    error = %e,
                    "Sample value probe failed"
                );
                Vec::new()
            }
        }
    }
}

/// Distinct values of `field` (null included), in row order, capped at [`SAMPLE_VALUE_LIMIT`]
pub(crate) fn distinct_values(field: &str, rows: Vec<Row>) -> Vec<Value> {
    let mut values: Vec<Value> = Vec::new();

    for mut row in rows {
        let Some(value) = row.remove(field) else {
            continue;
        };
        if values.contains(&value) {
            continue;
        }
        values.push(value);
        if values.len() == SAMPLE_VALUE_LIMIT as usize {
            break;
        }
    }

    values
}

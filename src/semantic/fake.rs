//! In-process backend double for enricher and gateway tests

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::cube::{AnalyticsBackend, CubeResult, Query, RawQueryResult, RawSchema, Row};

pub(crate) struct FakeBackend {
    meta: CubeResult<RawSchema>,
    probes: HashMap<String, CubeResult<RawQueryResult>>,
    query_result: CubeResult<RawQueryResult>,
    probe_delay: Duration,
    queries: Mutex<Vec<Query>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeBackend {
    pub fn new(meta: Value) -> Self {
        Self::with_meta(Ok(serde_json::from_value(meta).unwrap()))
    }

    pub fn with_meta(meta: CubeResult<RawSchema>) -> Self {
        Self {
            meta,
            probes: HashMap::new(),
            query_result: Ok(RawQueryResult::default()),
            probe_delay: Duration::ZERO,
            queries: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Rows returned when `dimension` is probed
    pub fn probe(mut self, dimension: &str, result: CubeResult<RawQueryResult>) -> Self {
        self.probes.insert(dimension.to_string(), result);
        self
    }

    /// Result for any non-probe query
    pub fn query_result(mut self, result: CubeResult<RawQueryResult>) -> Self {
        self.query_result = result;
        self
    }

    pub fn probe_delay(mut self, delay: Duration) -> Self {
        self.probe_delay = delay;
        self
    }

    pub fn queries(&self) -> Vec<Query> {
        self.queries.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalyticsBackend for FakeBackend {
    async fn get_meta(&self) -> CubeResult<RawSchema> {
        self.meta.clone()
    }

    async fn run_query(&self, query: &Query) -> CubeResult<RawQueryResult> {
        self.queries.lock().unwrap().push(query.clone());

        let is_probe = query.measures.is_empty() && query.dimensions.len() == 1;
        if !is_probe {
            return self.query_result.clone();
        }

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        if !self.probe_delay.is_zero() {
            tokio::time::sleep(self.probe_delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.probes
            .get(&query.dimensions[0])
            .cloned()
            .unwrap_or_else(|| Ok(RawQueryResult::default()))
    }
}

/// `{"data": [{field: value}, ...]}` with one row per value
pub(crate) fn rows(field: &str, values: &[Value]) -> RawQueryResult {
    let data: Vec<Row> = values
        .iter()
        .map(|v| {
            let mut row = Row::new();
            row.insert(field.to_string(), v.clone());
            row
        })
        .collect();

    RawQueryResult {
        data: Some(data),
        error: None,
    }
}

/// Two cubes: `orders` with mixed dimension types and `users` with one string dimension
pub(crate) fn sample_meta() -> Value {
    json!({
        "cubes": [
            {
                "name": "orders",
                "title": "Orders",
                "description": "Customer orders",
                "measures": [
                    {"name": "orders.count", "title": "Count", "description": "Number of orders", "type": "count"},
                    {"name": "orders.total", "title": "Total", "description": null, "type": "sum"}
                ],
                "dimensions": [
                    {"name": "orders.status", "title": "Status", "type": "string"},
                    {"name": "orders.created_at", "title": "Created at", "type": "time"},
                    {"name": "orders.amount", "title": "Amount", "type": "number"},
                    {"name": "orders.country", "title": "Country", "type": "string"},
                    {"name": "orders.is_paid", "title": "Paid", "type": "boolean"}
                ]
            },
            {
                "name": "users",
                "title": "Users",
                "measures": [{"name": "users.count", "title": "Count", "type": "count"}],
                "dimensions": [{"name": "users.plan", "title": "Plan", "type": "string"}]
            }
        ]
    })
}

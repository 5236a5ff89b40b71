//! Query Builder
//!
//! Turns the flat `run_cube_query` parameters into a Cube query object.
//!
//! ```rust,ignore
//! let query = QueryBuilder::new(["orders.count"])
//!     .dimensions(["orders.status"])
//!     .time_dimension("orders.created_at")
//!     .date_range(["2024-01-01", "2024-01-31"])
//!     .limit(100)
//!     .build()?;
//! ```

use serde::Deserialize;

use crate::cube::{DateRange, Query, TimeDimension};
use crate::semantic::error::{GatewayError, GatewayResult};

/// Arguments of the `run_cube_query` tool
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QueryParams {
    /// Measure names, at least one
    #[serde(default)]
    pub measures: Vec<String>,
    #[serde(default)]
    pub dimensions: Option<Vec<String>>,
    #[serde(default)]
    pub time_dimension: Option<String>,
    #[serde(default)]
    pub date_range: Option<Vec<String>>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl QueryParams {
    /// Build the backend query for these parameters
    pub fn build(&self) -> GatewayResult<Query> {
        let mut builder = QueryBuilder::new(self.measures.iter().cloned());

        if let Some(dimensions) = &self.dimensions {
            builder = builder.dimensions(dimensions.iter().cloned());
        }
        if let Some(time_dimension) = &self.time_dimension {
            builder = builder.time_dimension(time_dimension.clone());
        }
        if let Some(date_range) = &self.date_range {
            builder = builder.date_range(date_range.iter().cloned());
        }
        if let Some(limit) = self.limit {
            builder = builder.limit(limit);
        }

        builder.build()
    }
}

/// Builder for Cube queries
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    measures: Vec<String>,
    dimensions: Vec<String>,
    time_dimension: Option<String>,
    date_range: Vec<String>,
    limit: Option<i64>,
}

impl QueryBuilder {
    /// Create a new builder selecting the given measures
    pub fn new<I, S>(measures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            measures: measures.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Group by these dimensions
    pub fn dimensions<I, S>(mut self, dimensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dimensions = dimensions.into_iter().map(Into::into).collect();
        self
    }

    /// Time dimension to filter on; only used together with a date range
    pub fn time_dimension(mut self, dimension: impl Into<String>) -> Self {
        self.time_dimension = Some(dimension.into());
        self
    }

    /// `[start, end]` date range; only used together with a time dimension
    pub fn date_range<I, S>(mut self, range: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_range = range.into_iter().map(Into::into).collect();
        self
    }

    /// Row limit; zero or negative leaves the backend default
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Build the query
    ///
    /// A time dimension without a date range (or the reverse) is dropped
    /// silently rather than reported.
    pub fn build(self) -> GatewayResult<Query> {
        if self.measures.is_empty() {
            return Err(GatewayError::InvalidArgument(
                "measures must contain at least one measure".to_string(),
            ));
        }

        let time_dimension = self.time_dimension.filter(|d| !d.is_empty());
        let time_dimensions = match (time_dimension, self.date_range.is_empty()) {
            (Some(dimension), false) => vec![TimeDimension {
                dimension,
                date_range: date_range(self.date_range)?,
            }],
            _ => Vec::new(),
        };

        let limit = match self.limit {
            Some(limit) if limit > 0 => Some(u32::try_from(limit).map_err(|_| {
                GatewayError::InvalidArgument(format!("limit {} is too large", limit))
            })?),
            _ => None,
        };

        Ok(Query {
            measures: self.measures,
            dimensions: self.dimensions,
            time_dimensions,
            limit,
        })
    }
}

fn date_range(range: Vec<String>) -> GatewayResult<DateRange> {
    let count = range.len();
    let mut parts = range.into_iter();

    match (parts.next(), parts.next(), parts.next()) {
        (Some(start), Some(end), None) => Ok(DateRange(start, end)),
        _ => Err(GatewayError::InvalidArgument(format!(
            "date_range must contain exactly two dates, got {}",
            count
        ))),
    }
}

//! Cube wire types
//!
//! Typed records for the `/meta` and `/load` payloads of the Cube REST API.
//! Parsing validates required fields; anything the gateway does not use is ignored.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A single result row: field name -> scalar value
pub type Row = Map<String, Value>;

/// Dimension type tag for categorical fields
pub const STRING_TYPE: &str = "string";

/// Dimension type tag for date/time axes
pub const TIME_TYPE: &str = "time";

// ============================================
// /meta
// ============================================

/// Full schema description returned by `GET /meta`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawSchema {
    #[serde(default)]
    pub cubes: Vec<RawCube>,
}

/// A cube as described by the backend
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCube {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub measures: Vec<RawMeasure>,
    #[serde(default)]
    pub dimensions: Vec<RawDimension>,
}

/// A measure as described by the backend
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawMeasure {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A dimension as described by the backend
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawDimension {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Cube sends `null` for unset titles and descriptions
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================
// /load
// ============================================

/// Query object in the backend's native shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub measures: Vec<String>,
    pub dimensions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub time_dimensions: Vec<TimeDimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Query {
    /// Query listing up to `limit` values of a single dimension, no measures
    pub fn probe(dimension: impl Into<String>, limit: u32) -> Self {
        Self {
            measures: Vec::new(),
            dimensions: vec![dimension.into()],
            time_dimensions: Vec::new(),
            limit: Some(limit),
        }
    }
}

/// Time dimension filter: `{dimension, dateRange: [start, end]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeDimension {
    pub dimension: String,
    pub date_range: DateRange,
}

/// Inclusive `[start, end]` pair, serialized as a two-element array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange(pub String, pub String);

/// Body of `POST /load`
#[derive(Debug, Serialize)]
pub(crate) struct LoadRequest<'a> {
    pub query: &'a Query,
}

/// Response of `POST /load`
///
/// `data` may be absent; Cube reports failures (and unfinished queries)
/// through `error`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawQueryResult {
    #[serde(default)]
    pub data: Option<Vec<Row>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl RawQueryResult {
    /// Result rows, empty when the backend sent none
    pub fn into_rows(self) -> Vec<Row> {
        self.data.unwrap_or_default()
    }
}

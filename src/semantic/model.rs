//! Client-facing schema types
//!
//! What a calling agent sees from `get_cube_meta`. Built fresh per call.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::Value;

use crate::cube::{RawMeasure, STRING_TYPE, TIME_TYPE};

/// A cube with its measures and enriched dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct CubeSchema {
    pub name: String,
    pub title: String,
    pub description: String,
    pub measures: Vec<Measure>,
    pub dimensions: Vec<Dimension>,
}

impl CubeSchema {
    /// Time dimensions of this cube, in dimension order
    pub fn time_dimensions(&self) -> Vec<TimeDimensionSummary> {
        self.dimensions
            .iter()
            .filter(|d| d.is_time())
            .map(|d| TimeDimensionSummary {
                name: d.name.clone(),
                title: d.title.clone(),
            })
            .collect()
    }
}

// `timeDimensions` is derived from `dimensions` at serialization time
impl Serialize for CubeSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CubeSchema", 6)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("description", &self.description)?;
        state.serialize_field("measures", &self.measures)?;
        state.serialize_field("dimensions", &self.dimensions)?;
        state.serialize_field("timeDimensions", &self.time_dimensions())?;
        state.end()
    }
}

/// Quantitative, aggregatable field
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Measure {
    pub name: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<RawMeasure> for Measure {
    fn from(raw: RawMeasure) -> Self {
        Self {
            name: raw.name,
            title: raw.title,
            description: raw.description,
            kind: raw.kind,
        }
    }
}

/// Categorical or temporal field, with sample values for string dimensions
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Dimension {
    pub name: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub sample_values: Vec<Value>,
}

impl Dimension {
    pub fn is_string(&self) -> bool {
        self.kind == STRING_TYPE
    }

    pub fn is_time(&self) -> bool {
        self.kind == TIME_TYPE
    }
}

/// `{name, title}` view of a time dimension
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TimeDimensionSummary {
    pub name: String,
    pub title: String,
}

/// Result of schema discovery: either the cubes or an error message
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum DiscoverResponse {
    Cubes { cubes: Vec<CubeSchema> },
    Error { error: String },
}

impl DiscoverResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, DiscoverResponse::Error { .. })
    }
}

//! Series definitions and the dimensions that tell series apart.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One axis along which series definitions can differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// The source file a series was read from
    Source,
    /// The column within the source
    Field,
}

impl Dimension {
    /// Both dimensions, in composite-key order
    pub const ALL: [Dimension; 2] = [Dimension::Source, Dimension::Field];

    /// Name of the dimension
    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Source => "source",
            Dimension::Field => "field",
        }
    }

    /// Key under which datapoints carry this dimension's value
    pub fn datapoint_key(self) -> &'static str {
        match self {
            Dimension::Source => "filename",
            Dimension::Field => "field",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `(source, field)` pair identifying one logical series of y-values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesDefinition {
    /// Source file name (`filename` is accepted when deserializing)
    #[serde(alias = "filename")]
    pub source: String,
    /// Field name within the source
    pub field: String,
}

impl SeriesDefinition {
    pub fn new(source: impl Into<String>, field: impl Into<String>) -> Self {
        Self { source: source.into(), field: field.into() }
    }

    /// Value of this definition along `dimension`
    pub fn value(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Source => &self.source,
            Dimension::Field => &self.field,
        }
    }
}

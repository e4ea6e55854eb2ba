//! Data models for rendering (datapoints, series definitions, properties)

mod datapoint;
mod properties;
mod series;

// Re-export all public types
pub use datapoint::{distinct_revs, scalar_text, Datapoint, REV_FIELD};
pub use properties::{Properties, TemplateSpec, DEFAULT_PLOT_SIZE};
pub use series::{Dimension, SeriesDefinition};

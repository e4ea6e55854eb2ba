//! plotrender - Library for filling Vega-Lite plot templates
//!
//! This library provides functionality to:
//! - Resolve plot templates by name, path, or instance
//! - Fill anchor tokens in templates with datapoints and display properties
//! - Derive color, dash, and shape encodings from the plotted series
//! - Assemble rendered plots into a standalone HTML page or a Markdown report

pub mod config;
pub mod encoding;
pub mod error;
pub mod filesystem;
pub mod html;
pub mod markdown;
pub mod models;
pub mod palettes;
pub mod registry;
pub mod renderer;
pub mod templates;
pub mod variation;
pub mod vega;

pub use error::{RenderError, Result};
pub use models::{Datapoint, Properties, SeriesDefinition};
pub use templates::{Template, TemplateCatalog};
pub use vega::{FilledTemplate, VegaRenderer};

//! Error types for template resolution and rendering

use thiserror::Error;

/// Errors raised while resolving, dumping, or filling templates.
///
/// Every variant is fatal to the current render call. Empty input is not an
/// error; it renders to an empty result.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RenderError {
    /// Requested template name or path resolves to nothing
    #[error("Template '{0}' not found.")]
    TemplateNotFound(String),
    /// A dump target already exists with different content
    #[error(
        "Template '{path}' already exists and its content is different than '{name}' content. \
         Remove it manually if you want to recreate it."
    )]
    TemplateContentMismatch { name: String, path: String },
    /// A required field is absent from every datapoint
    #[error("Field '{0}' does not exist in provided data.")]
    NoFieldInData(String),
    /// Template content is unusable
    #[error("Bad template: {0}")]
    BadTemplate(String),
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parse or serialization error
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Properties file could not be parsed
    #[error("Failed to parse properties: {0}")]
    Config(String),
}

impl From<toml::de::Error> for RenderError {
    fn from(e: toml::de::Error) -> Self {
        RenderError::Config(e.to_string())
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, RenderError>;

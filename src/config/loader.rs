//! Properties file parsing and validation.

use crate::error::{RenderError, Result};
use crate::models::Properties;
use std::fs;
use std::path::Path;

/// Properties validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertiesValidationError {
    /// Name of the invalid field
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for PropertiesValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "properties: '{}' {}", self.field, self.message)
    }
}

/// Check loaded properties and return every problem found.
pub fn validate(properties: &Properties) -> Vec<PropertiesValidationError> {
    let mut errors = Vec::new();

    for (field, value) in [("x", &properties.x), ("y", &properties.y)] {
        if value.as_deref() == Some("") {
            errors.push(PropertiesValidationError {
                field: field.to_string(),
                message: "must be a non-empty field name".to_string(),
            });
        }
    }

    for (field, size) in [("plot_width", properties.plot_width), ("plot_height", properties.plot_height)] {
        if size == Some(0) {
            errors.push(PropertiesValidationError {
                field: field.to_string(),
                message: "must be a positive integer".to_string(),
            });
        }
    }

    for (i, definition) in properties.anchors_y_definitions.iter().enumerate() {
        if definition.field.is_empty() {
            errors.push(PropertiesValidationError {
                field: format!("anchors_y_definitions[{}].field", i),
                message: "must be a non-empty field name".to_string(),
            });
        }
    }

    errors
}

fn checked(properties: Properties) -> Result<Properties> {
    let errors = validate(&properties);
    if errors.is_empty() {
        return Ok(properties);
    }
    let lines: Vec<String> = errors.iter().map(|e| format!("  - {}", e)).collect();
    Err(RenderError::Config(format!("validation failed:\n{}", lines.join("\n"))))
}

/// Parse and validate properties from TOML text.
///
/// ```
/// use plotrender::config::properties_from_toml_str;
///
/// let props = properties_from_toml_str("template = \"scatter\"\nx = \"step\"").unwrap();
/// assert_eq!(props.x.as_deref(), Some("step"));
/// ```
pub fn properties_from_toml_str(contents: &str) -> Result<Properties> {
    checked(toml::from_str(contents)?)
}

/// Parse and validate properties from JSON text.
pub fn properties_from_json_str(contents: &str) -> Result<Properties> {
    checked(serde_json::from_str(contents)?)
}

/// Load properties from a file.
///
/// Files ending in `.toml` are parsed as TOML, everything else as JSON.
pub fn load_properties(path: &Path) -> Result<Properties> {
    let contents = fs::read_to_string(path)?;
    let is_toml = path.extension().and_then(|e| e.to_str()) == Some("toml");
    tracing::debug!(path = %path.display(), is_toml, "loading properties");
    if is_toml {
        properties_from_toml_str(&contents)
    } else {
        properties_from_json_str(&contents)
    }
}

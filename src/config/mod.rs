//! Loading renderer properties from configuration files
//!
//! Properties can be kept next to the plotted data as TOML or JSON.

pub mod loader;

pub use loader::{
    load_properties, properties_from_json_str, properties_from_toml_str, validate,
    PropertiesValidationError,
};

//! Vega-Lite templates for plots.
//!
//! A template is a JSON document carrying anchor tokens of the form
//! `<DVC_METRIC_{NAME}>`. Rendering substitutes concrete values for them.
//!
//! ```
//! use plotrender::templates::{get_template, Template};
//! use serde_json::json;
//!
//! let mut template = get_template(None, None).unwrap();
//! assert_eq!(template.name(), "linear");
//!
//! template.fill_anchor("title", &json!("Loss"));
//! assert!(!template.has_anchor("title"));
//! ```
//!
//! Available built-ins:
//! - `simple`: One line per revision
//! - `linear`: Lines with a hover rule tooltip (the default)
//! - `smooth`: Loess-smoothed lines with a bandwidth slider
//! - `scatter`, `scatter_jitter`: Point plots
//! - `confusion`, `confusion_normalized`: Confusion matrices
//! - `bar_horizontal`, `bar_horizontal_sorted`: Horizontal bars

mod builtin;
mod catalog;
mod template;

pub use builtin::{get_builtin, list_builtins, DEFAULT_TEMPLATE};
pub use catalog::{dump_templates, find_template, get_template, TemplateCatalog};
pub use template::{find_exact_value, find_value, replace_value, FillPass, Template, EXTENSION};

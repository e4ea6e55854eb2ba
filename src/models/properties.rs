//! Renderer display properties.

use super::SeriesDefinition;
use crate::templates::Template;
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;

/// Default plot width and height in pixels
pub const DEFAULT_PLOT_SIZE: u32 = 300;

/// How a renderer picks its template.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateSpec {
    /// A built-in name or a path to a template file
    Named(String),
    /// An already constructed template, used as-is
    Instance(Template),
}

impl From<&str> for TemplateSpec {
    fn from(name: &str) -> Self {
        TemplateSpec::Named(name.to_string())
    }
}

impl From<String> for TemplateSpec {
    fn from(name: String) -> Self {
        TemplateSpec::Named(name)
    }
}

impl From<Template> for TemplateSpec {
    fn from(template: Template) -> Self {
        TemplateSpec::Instance(template)
    }
}

// Property files can only name a template.
impl<'de> Deserialize<'de> for TemplateSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(TemplateSpec::Named)
    }
}

/// Display properties recognized by [`crate::vega::VegaRenderer`].
///
/// Every field is optional; the accessors apply the documented defaults.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Properties {
    /// Template name, path, or instance. Defaults to the `linear` built-in
    pub template: Option<TemplateSpec>,
    /// Directory searched first when `template` is a path
    pub template_dir: Option<PathBuf>,
    /// Field plotted on the x axis
    pub x: Option<String>,
    /// Field plotted on the y axis
    pub y: Option<String>,
    /// X axis title. Defaults to `x`
    pub x_label: Option<String>,
    /// Y axis title. Defaults to `y`
    pub y_label: Option<String>,
    /// Plot title. Defaults to empty
    pub title: Option<String>,
    /// Series contributing y-values
    pub anchors_y_definitions: Vec<SeriesDefinition>,
    /// Revisions known to the caller, in legend order.
    /// When unset, the revisions found in the datapoints are used
    pub revs_with_datapoints: Option<Vec<String>>,
    /// Plot width in pixels
    pub plot_width: Option<u32>,
    /// Plot height in pixels
    pub plot_height: Option<u32>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, template: impl Into<TemplateSpec>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dir = Some(dir.into());
        self
    }

    pub fn with_x(mut self, x: impl Into<String>) -> Self {
        self.x = Some(x.into());
        self
    }

    pub fn with_y(mut self, y: impl Into<String>) -> Self {
        self.y = Some(y.into());
        self
    }

    pub fn with_x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = Some(label.into());
        self
    }

    pub fn with_y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_y_definitions(mut self, definitions: Vec<SeriesDefinition>) -> Self {
        self.anchors_y_definitions = definitions;
        self
    }

    pub fn with_revs(mut self, revs: Vec<String>) -> Self {
        self.revs_with_datapoints = Some(revs);
        self
    }

    /// Title text, empty when unset
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// X axis label, falling back to the x field name
    pub fn x_label(&self) -> Option<&str> {
        self.x_label.as_deref().or(self.x.as_deref())
    }

    /// Y axis label, falling back to the y field name
    pub fn y_label(&self) -> Option<&str> {
        self.y_label.as_deref().or(self.y.as_deref())
    }

    pub fn plot_width(&self) -> u32 {
        self.plot_width.unwrap_or(DEFAULT_PLOT_SIZE)
    }

    pub fn plot_height(&self) -> u32 {
        self.plot_height.unwrap_or(DEFAULT_PLOT_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let props = Properties::new();
        assert_eq!(props.title(), "");
        assert_eq!(props.x_label(), None);
        assert_eq!(props.plot_width(), 300);
        assert_eq!(props.plot_height(), 300);
        assert!(props.anchors_y_definitions.is_empty());
    }

    #[test]
    fn test_labels_fall_back_to_fields() {
        let props = Properties::new().with_x("step").with_y("loss").with_y_label("Loss");
        assert_eq!(props.x_label(), Some("step"));
        assert_eq!(props.y_label(), Some("Loss"));
    }

    #[test]
    fn test_deserialize_template_name() {
        let props: Properties =
            serde_json::from_str(r#"{"template": "scatter", "x": "a", "plot_width": 500}"#)
                .unwrap();
        assert_eq!(props.template, Some(TemplateSpec::Named("scatter".to_string())));
        assert_eq!(props.x.as_deref(), Some("a"));
        assert_eq!(props.plot_width(), 500);
    }
}

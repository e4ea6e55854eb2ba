//! Vega-Lite renderer: fills a template with datapoints and display properties.
//!
//! A fill pass runs in a fixed order:
//! 1. The template is reset to its original content
//! 2. Empty datapoints short-circuit to an empty result
//! 3. In strict mode the `x` and `y` fields must exist in the data
//! 4. Optional anchors are filled, reshaping the datapoints
//! 5. Required anchors are filled: `title`, `x`, `y`, `x_label`, `y_label`, `data`
//!
//! Anchors named in `split_anchors` are left in the document and their values
//! are returned separately, keyed by anchor token.

use crate::encoding::OptionalEncodingFiller;
use crate::error::{RenderError, Result};
use crate::models::{Datapoint, Properties};
use crate::renderer::{div_id, matches_extension, Renderer};
use crate::templates::{FillPass, Template, TemplateCatalog};
use serde_json::{json, Map, Value};

/// Script tags that load the charting engine
const SCRIPTS: &str = r#"
<script src="https://cdn.jsdelivr.net/npm/vega@5.20.2"></script>
<script src="https://cdn.jsdelivr.net/npm/vega-lite@5.2.0"></script>
<script src="https://cdn.jsdelivr.net/npm/vega-embed@6.18.2"></script>
"#;

/// Data file extensions this renderer can plot
pub const EXTENSIONS: &[&str] = &[".yml", ".yaml", ".json", ".csv", ".tsv"];

/// Required anchors, in fill order
pub const REQUIRED_ANCHORS: &[&str] = &["title", "x", "y", "x_label", "y_label", "data"];

/// Anchors split out by [`VegaRenderer::get_partial_filled_template`]
pub const PARTIAL_SPLIT_ANCHORS: &[&str] = &[
    "color",
    "data",
    "plot_height",
    "plot_width",
    "shape",
    "stroke_dash",
    "title",
    "x_label",
    "y_label",
    "zoom_and_pan",
];

/// Result of a fill pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FilledTemplate {
    /// The filled specification. Split anchors keep their tokens.
    pub content: Value,
    /// Anchor token -> value, for every anchor that was split out
    pub split_content: Map<String, Value>,
}

impl FilledTemplate {
    fn empty() -> Self {
        Self { content: Value::Object(Map::new()), split_content: Map::new() }
    }

    /// Whether the pass had no data to render
    pub fn is_empty(&self) -> bool {
        self.split_content.is_empty() && self.content.as_object().map_or(true, Map::is_empty)
    }

    /// The specification as JSON text
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.content)?)
    }

    pub fn into_parts(self) -> (Value, Map<String, Value>) {
        (self.content, self.split_content)
    }
}

/// Renderer for Vega-Lite plots.
///
/// # Example
///
/// ```
/// use plotrender::models::Properties;
/// use plotrender::vega::VegaRenderer;
/// use serde_json::json;
///
/// let datapoints = vec![
///     json!({"x": 100, "y": 100}).as_object().cloned().unwrap(),
///     json!({"x": 200, "y": 300}).as_object().cloned().unwrap(),
/// ];
/// let props = Properties::new().with_x("x").with_y("y");
///
/// let mut renderer = VegaRenderer::new(datapoints, "loss", props);
/// let filled = renderer.get_filled_template(&[], true).unwrap();
/// assert_eq!(filled.content["data"]["values"][1]["y"], 300);
/// ```
#[derive(Debug, Clone)]
pub struct VegaRenderer {
    datapoints: Vec<Datapoint>,
    name: String,
    properties: Properties,
    /// Resolved on first fill unless supplied up front
    template: Option<Template>,
}

impl VegaRenderer {
    /// Create a renderer whose template is resolved from the built-in catalog.
    ///
    /// Resolution happens on the first fill, so an empty plot never fails.
    pub fn new(datapoints: Vec<Datapoint>, name: impl Into<String>, properties: Properties) -> Self {
        Self { datapoints, name: name.into(), properties, template: None }
    }

    /// Create a renderer, resolving its template against `catalog` now.
    pub fn with_catalog(
        datapoints: Vec<Datapoint>,
        name: impl Into<String>,
        properties: Properties,
        catalog: &TemplateCatalog,
    ) -> Result<Self> {
        let template =
            catalog.resolve(properties.template.as_ref(), properties.template_dir.as_deref())?;
        Ok(Self { datapoints, name: name.into(), properties, template: Some(template) })
    }

    pub fn datapoints(&self) -> &[Datapoint] {
        &self.datapoints
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// The template, resolving it if needed.
    pub fn template(&mut self) -> Result<&Template> {
        resolve_slot(&mut self.template, &self.properties).map(|t| &*t)
    }

    /// Fill the template.
    ///
    /// # Arguments
    ///
    /// * `split_anchors` - Anchors to return separately instead of substituting
    /// * `strict` - Fail when the `x` or `y` field is missing from the data
    ///
    /// # Errors
    ///
    /// * [`RenderError::NoFieldInData`] - strict mode and a field is missing
    /// * [`RenderError::BadTemplate`] - the template has no `data` anchor
    /// * [`RenderError::TemplateNotFound`] - the template could not be resolved
    #[tracing::instrument(skip(self), fields(plot = %self.name))]
    pub fn get_filled_template(
        &mut self,
        split_anchors: &[&str],
        strict: bool,
    ) -> Result<FilledTemplate> {
        if let Some(template) = self.template.as_mut() {
            template.reset();
        }
        if self.datapoints.is_empty() {
            return Ok(FilledTemplate::empty());
        }

        if strict {
            for field in [&self.properties.x, &self.properties.y].into_iter().flatten() {
                Template::check_field_exists(&self.datapoints, field)?;
            }
        }

        let template = resolve_slot(&mut self.template, &self.properties)?;
        let mut pass = FillPass::new(&mut *template, split_anchors);
        OptionalEncodingFiller::new(&self.properties).fill(&mut pass, &mut self.datapoints);

        for &name in REQUIRED_ANCHORS {
            let Some(value) = required_value(&self.properties, &self.datapoints, name) else {
                continue;
            };
            if pass.is_split(name) {
                pass.defer(name, value);
                continue;
            }
            let value = match name {
                "data" if !pass.template().has_exact_anchor(name) => {
                    return Err(RenderError::BadTemplate(format!(
                        "Template '{}' is not using '{}' anchor",
                        pass.template().name(),
                        Template::anchor(name)
                    )));
                }
                "x" | "y" => match value.as_str() {
                    Some(field) => json!(Template::escape_special_characters(field)),
                    None => value,
                },
                _ => value,
            };
            pass.fill(name, &value);
        }

        let split_content = pass.finish();
        Ok(FilledTemplate { content: template.content().clone(), split_content })
    }

    /// Fill the template and serialize the specification.
    pub fn get_filled_template_string(
        &mut self,
        split_anchors: &[&str],
        strict: bool,
    ) -> Result<String> {
        self.get_filled_template(split_anchors, strict)?.to_json_string()
    }

    /// Fill everything except the volatile anchors.
    ///
    /// Returns the specification text and `{"anchor_definitions": {...}}`
    /// holding the split-out values keyed by anchor token.
    pub fn get_partial_filled_template(&mut self) -> Result<(String, Value)> {
        let filled = self.get_filled_template(PARTIAL_SPLIT_ANCHORS, true)?;
        let content = filled.to_json_string()?;
        Ok((content, json!({"anchor_definitions": filled.split_content})))
    }
}

/// Resolve the renderer's template into `slot` unless already there.
fn resolve_slot<'a>(slot: &'a mut Option<Template>, properties: &Properties) -> Result<&'a mut Template> {
    let template = match slot.take() {
        Some(template) => template,
        None => TemplateCatalog::builtin()
            .resolve(properties.template.as_ref(), properties.template_dir.as_deref())?,
    };
    Ok(slot.insert(template))
}

/// Value a required anchor is filled with, if the properties provide one.
fn required_value(properties: &Properties, datapoints: &[Datapoint], name: &str) -> Option<Value> {
    match name {
        "title" => Some(json!(properties.title())),
        "x" => properties.x.as_deref().map(|x| json!(x)),
        "y" => properties.y.as_deref().map(|y| json!(y)),
        "x_label" => properties.x_label().map(|l| json!(l)),
        "y_label" => properties.y_label().map(|l| json!(l)),
        "data" => Some(Value::Array(datapoints.iter().cloned().map(Value::Object).collect())),
        _ => None,
    }
}

impl Renderer for VegaRenderer {
    fn type_name(&self) -> &'static str {
        "vega"
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn scripts(&self) -> &'static str {
        SCRIPTS
    }

    fn matches(filename: &str) -> bool {
        matches_extension(filename, EXTENSIONS)
    }

    fn partial_html(&mut self) -> Result<String> {
        if self.datapoints.is_empty() {
            return Ok(String::new());
        }
        self.get_filled_template_string(&[], true)
    }

    fn generate_html(&mut self) -> Result<String> {
        let partial = self.partial_html()?;
        if partial.is_empty() {
            return Ok(String::new());
        }
        let id = div_id(&self.name);
        Ok(format!(
            r#"
<div id = "{id}">
    <script type = "text/javascript">
        var spec = {partial};
        vegaEmbed('#{id}', spec);
    </script>
</div>
"#
        ))
    }
}

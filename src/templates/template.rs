//! Anchor templates: JSON documents carrying `<DVC_METRIC_{NAME}>` placeholders.

use crate::error::{RenderError, Result};
use crate::models::{scalar_text, Datapoint};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// File extension used for template files
pub const EXTENSION: &str = "json";

/// Prefix and suffix wrapped around an uppercased anchor name
const ANCHOR_PREFIX: &str = "<DVC_METRIC_";
const ANCHOR_SUFFIX: &str = ">";

/// Characters with meaning in the charting library's field paths
const SPECIAL_CHARACTERS: [char; 3] = ['.', '[', ']'];

/// A named JSON document with anchor placeholders.
///
/// The original content never changes after construction. Filling works on
/// a separate working copy that [`Template::reset`] restores, so one instance
/// can be filled repeatedly. A single instance must not be shared between
/// concurrent fill passes.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    name: String,
    original: Value,
    content: Value,
}

impl Template {
    /// Create a template from JSON content.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::BadTemplate`] if `content` is not a JSON object.
    pub fn new(name: impl Into<String>, content: Value) -> Result<Self> {
        let name = name.into();
        if !content.is_object() {
            return Err(RenderError::BadTemplate(format!(
                "content of template '{}' must be a JSON object",
                name
            )));
        }
        Ok(Self { name, original: content.clone(), content })
    }

    /// Built-in content is a JSON object literal, so no check is needed.
    pub(crate) fn from_builtin(name: &str, content: Value) -> Self {
        Self { name: name.to_string(), original: content.clone(), content }
    }

    /// Parse template content from JSON text.
    pub fn from_json_str(name: impl Into<String>, json: &str) -> Result<Self> {
        let content: Value = serde_json::from_str(json)?;
        Self::new(name, content)
    }

    /// Format the anchor token for `name`.
    ///
    /// ```
    /// use plotrender::templates::Template;
    ///
    /// assert_eq!(Template::anchor("x_label"), "<DVC_METRIC_X_LABEL>");
    /// ```
    pub fn anchor(name: &str) -> String {
        format!("{}{}{}", ANCHOR_PREFIX, name.to_uppercase(), ANCHOR_SUFFIX)
    }

    /// Escape `.`, `[` and `]` so `value` can be used as a field reference.
    pub fn escape_special_characters(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len());
        for c in value.chars() {
            if SPECIAL_CHARACTERS.contains(&c) {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped
    }

    /// Check that at least one datapoint carries `field`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::NoFieldInData`] when no row has the key.
    pub fn check_field_exists(data: &[Datapoint], field: &str) -> Result<()> {
        if data.iter().any(|row| row.contains_key(field)) {
            Ok(())
        } else {
            Err(RenderError::NoFieldInData(field.to_string()))
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// File name the template is stored under (`<name>.json`)
    pub fn filename(&self) -> PathBuf {
        PathBuf::from(&self.name).with_extension(EXTENSION)
    }

    /// Current working content
    pub fn content(&self) -> &Value {
        &self.content
    }

    /// Content as it was constructed, before any fill
    pub fn original_content(&self) -> &Value {
        &self.original
    }

    /// Restore the working content to the original document.
    pub fn reset(&mut self) {
        self.content = self.original.clone();
    }

    /// Whether the working content still contains the anchor for `name`.
    pub fn has_anchor(&self, name: &str) -> bool {
        find_value(&self.content, &Self::anchor(name))
    }

    /// Whether some string leaf is exactly the anchor for `name`.
    ///
    /// Only such a leaf can receive a container value.
    pub fn has_exact_anchor(&self, name: &str) -> bool {
        find_exact_value(&self.content, &Self::anchor(name))
    }

    /// Replace every occurrence of the anchor for `name` with `value`.
    pub fn fill_anchor(&mut self, name: &str, value: &Value) {
        self.content = replace_value(&self.content, &Self::anchor(name), value);
    }

    /// Serialize the original content the way it is stored on disk.
    pub fn to_file_content(&self) -> Result<String> {
        let mut text = serde_json::to_string_pretty(&self.original)?;
        text.push('\n');
        Ok(text)
    }
}

/// Search `tree` for a string leaf equal to or containing `token`.
pub fn find_value(tree: &Value, token: &str) -> bool {
    match tree {
        Value::String(s) => s.contains(token),
        Value::Array(items) => items.iter().any(|item| find_value(item, token)),
        Value::Object(map) => map.values().any(|v| find_value(v, token)),
        Value::Null | Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Search `tree` for a string leaf equal to `token`.
pub fn find_exact_value(tree: &Value, token: &str) -> bool {
    match tree {
        Value::String(s) => s == token,
        Value::Array(items) => items.iter().any(|item| find_exact_value(item, token)),
        Value::Object(map) => map.values().any(|v| find_exact_value(v, token)),
        Value::Null | Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Return a copy of `tree` with `token` replaced by `value`.
///
/// A leaf exactly equal to `token` becomes `value`, which may be a container.
/// A leaf that only contains `token` gets text substitution: scalars as plain
/// text, containers as compact JSON. Map keys are never touched.
pub fn replace_value(tree: &Value, token: &str, value: &Value) -> Value {
    match tree {
        Value::String(s) if s == token => value.clone(),
        Value::String(s) if s.contains(token) => {
            let text = scalar_text(value).unwrap_or_else(|| value.to_string());
            Value::String(s.replace(token, &text))
        }
        Value::Array(items) => {
            Value::Array(items.iter().map(|item| replace_value(item, token, value)).collect())
        }
        Value::Object(map) => Value::Object(
            map.iter().map(|(k, v)| (k.clone(), replace_value(v, token, value))).collect(),
        ),
        other => other.clone(),
    }
}

/// One fill pass over a template.
///
/// Tracks which anchors the caller asked to split out. Split anchors keep
/// their token in the document and their value is collected, keyed by the
/// anchor token, for the caller to substitute later.
#[derive(Debug)]
pub struct FillPass<'a> {
    template: &'a mut Template,
    split_anchors: BTreeSet<String>,
    split_content: Map<String, Value>,
}

impl<'a> FillPass<'a> {
    /// Start a pass. The template is reset first.
    pub fn new<I, S>(template: &'a mut Template, split_anchors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        template.reset();
        let split_anchors = split_anchors.into_iter().map(|s| s.as_ref().to_uppercase()).collect();
        Self { template, split_anchors, split_content: Map::new() }
    }

    pub fn template(&self) -> &Template {
        &*self.template
    }

    pub fn is_split(&self, name: &str) -> bool {
        self.split_anchors.contains(&name.to_uppercase())
    }

    /// Substitute `value` in place, or record it if `name` is split out.
    pub fn apply(&mut self, name: &str, value: Value) {
        if self.is_split(name) {
            self.defer(name, value);
        } else {
            tracing::trace!(anchor = name, "filling anchor");
            self.template.fill_anchor(name, &value);
        }
    }

    /// Substitute `value` in place regardless of the split set.
    pub fn fill(&mut self, name: &str, value: &Value) {
        self.template.fill_anchor(name, value);
    }

    /// Record `value` as split content for `name`.
    pub fn defer(&mut self, name: &str, value: Value) {
        tracing::trace!(anchor = name, "splitting anchor out");
        self.split_content.insert(Template::anchor(name), value);
    }

    /// Finish the pass, returning the split content.
    pub fn finish(self) -> Map<String, Value> {
        self.split_content
    }
}

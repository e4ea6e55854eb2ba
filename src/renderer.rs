//! Renderer contract shared by plot renderers

use crate::error::Result;
use std::path::Path;

/// Characters that cannot appear in an HTML id
const SPECIAL_CHARS: &str = r"!@#$%^&*()[]{};,<>?\/:.|`~=_+";

/// A renderer turns one plot's data into embeddable markup.
///
/// Page builders collect [`Renderer::scripts`] once per renderer kind and
/// place each [`Renderer::generate_html`] result in the page body.
pub trait Renderer {
    /// Renderer kind, e.g. `vega`
    fn type_name(&self) -> &'static str;

    /// Name of the plot being rendered
    fn name(&self) -> &str;

    /// Script tags the page needs to display this renderer's output
    fn scripts(&self) -> &'static str;

    /// Whether this kind of renderer can plot `filename`
    fn matches(filename: &str) -> bool
    where
        Self: Sized;

    /// Markup placed inside the plot's div.
    fn partial_html(&mut self) -> Result<String>;

    /// Wrap [`Renderer::partial_html`] in a div whose id is derived from the name.
    fn generate_html(&mut self) -> Result<String> {
        let partial = self.partial_html()?;
        let id = div_id(self.name());
        Ok(format!("\n<div id=\"{id}\">\n  {partial}\n</div>\n"))
    }

    /// Markdown for a report written to `report_path`.
    ///
    /// Renderers whose output cannot be expressed in Markdown contribute nothing.
    fn generate_markdown(&mut self, report_path: &Path) -> Result<String> {
        let _ = report_path;
        Ok(String::new())
    }
}

/// Replace characters that are invalid in an HTML id with `_`.
///
/// ```
/// use plotrender::renderer::remove_special_chars;
///
/// assert_eq!(remove_special_chars("dir/metrics.json"), "dir_metrics_json");
/// ```
pub fn remove_special_chars(value: &str) -> String {
    value.chars().map(|c| if SPECIAL_CHARS.contains(c) { '_' } else { c }).collect()
}

/// Id of the div holding a plot named `name`
pub fn div_id(name: &str) -> String {
    format!("plot_{}", remove_special_chars(name))
}

/// Whether `filename` ends with one of `extensions` (given with the dot).
pub fn matches_extension(filename: &str, extensions: &[&str]) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map_or(false, |ext| extensions.iter().any(|known| known.strip_prefix('.') == Some(ext)))
}

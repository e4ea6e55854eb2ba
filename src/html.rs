//! HTML page assembly from renderer outputs.

use crate::error::{RenderError, Result};
use crate::renderer::Renderer;
use std::fs;
use std::path::{Path, PathBuf};

/// Default page template
const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    {refresh_tag}
    <title>DVC Plot</title>
    {scripts}
</head>
<body>
    {plot_divs}
</body>
</html>"#;

const SCRIPTS_PLACEHOLDER: &str = "scripts";
const PLOTS_PLACEHOLDER: &str = "plot_divs";
const REFRESH_PLACEHOLDER: &str = "refresh_tag";

/// An HTML page collecting plot divs and the scripts they need.
#[derive(Debug, Clone)]
pub struct HtmlPage {
    template: String,
    elements: Vec<String>,
    scripts: String,
    refresh_tag: String,
}

impl HtmlPage {
    /// Create a page from `template`, or the default page.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::BadTemplate`] if the template has no `{plot_divs}`.
    pub fn new(template: Option<&str>, refresh_seconds: Option<u32>) -> Result<Self> {
        let template = template.unwrap_or(PAGE_HTML);
        let placeholder = format!("{{{}}}", PLOTS_PLACEHOLDER);
        if !template.contains(&placeholder) {
            return Err(RenderError::BadTemplate(format!(
                "HTML template has to contain '{}'.",
                placeholder
            )));
        }
        let refresh_tag = refresh_seconds
            .map(|s| format!("<meta http-equiv=\"refresh\" content=\"{}\">", s))
            .unwrap_or_default();
        Ok(Self {
            template: template.to_string(),
            elements: Vec::new(),
            scripts: String::new(),
            refresh_tag,
        })
    }

    /// Add script tags unless the page already has them.
    pub fn with_scripts(&mut self, scripts: &str) -> &mut Self {
        if !self.scripts.contains(scripts) {
            if !self.scripts.is_empty() {
                self.scripts.push('\n');
            }
            self.scripts.push_str(scripts);
        }
        self
    }

    /// Add an element to the page body.
    pub fn with_element(&mut self, html: &str) -> &mut Self {
        self.elements.push(html.to_string());
        self
    }

    /// Fill the page template with the collected scripts and elements.
    pub fn embed(&self) -> String {
        let plots = self.elements.join("\n");
        substitute(
            &self.template,
            &[
                (SCRIPTS_PLACEHOLDER, self.scripts.as_str()),
                (PLOTS_PLACEHOLDER, plots.as_str()),
                (REFRESH_PLACEHOLDER, self.refresh_tag.as_str()),
            ],
        )
    }
}

/// Replace `{name}` placeholders in one pass, so inserted text is never rescanned.
pub(crate) fn substitute(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let found = values.iter().find(|(name, _)| {
            tail[1..].starts_with(name) && tail[1 + name.len()..].starts_with('}')
        });
        match found {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Render every renderer into one HTML page written to `output_file`.
///
/// The parent directory is created if needed. `template_path` points at a
/// custom page template containing `{plot_divs}`.
#[tracing::instrument(skip(renderers))]
pub fn render_html(
    renderers: &mut [Box<dyn Renderer>],
    output_file: &Path,
    template_path: Option<&Path>,
    refresh_seconds: Option<u32>,
) -> Result<PathBuf> {
    if let Some(parent) = output_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let page_template = template_path.map(fs::read_to_string).transpose()?;
    let mut page = HtmlPage::new(page_template.as_deref(), refresh_seconds)?;

    for renderer in renderers.iter_mut() {
        page.with_scripts(renderer.scripts());
        let html = renderer.generate_html()?;
        page.with_element(&html);
    }

    fs::write(output_file, page.embed())?;
    tracing::debug!(path = %output_file.display(), "page written");
    Ok(output_file.to_path_buf())
}

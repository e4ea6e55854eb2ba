//! Markdown report assembly from renderer outputs.

use crate::error::{RenderError, Result};
use crate::html::substitute;
use crate::renderer::Renderer;
use std::fs;
use std::path::{Path, PathBuf};

/// Default report template
const PAGE_MARKDOWN: &str = "# DVC Report\n{renderers}\n";

const RENDERERS_PLACEHOLDER: &str = "renderers";

/// A Markdown document collecting renderer elements.
#[derive(Debug, Clone)]
pub struct MarkdownPage {
    template: String,
    elements: Vec<String>,
}

impl MarkdownPage {
    /// Create a document from `template`, or the default report.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::BadTemplate`] if the template has no `{renderers}`.
    pub fn new(template: Option<&str>) -> Result<Self> {
        let template = template.unwrap_or(PAGE_MARKDOWN);
        let placeholder = format!("{{{}}}", RENDERERS_PLACEHOLDER);
        if !template.contains(&placeholder) {
            return Err(RenderError::BadTemplate(format!(
                "Markdown template has to contain '{}'.",
                placeholder
            )));
        }
        Ok(Self { template: template.to_string(), elements: Vec::new() })
    }

    pub fn with_element(&mut self, md: &str) -> &mut Self {
        self.elements.push(md.to_string());
        self
    }

    /// Fill the template with the collected elements, one per line.
    pub fn embed(&self) -> String {
        let elements = self.elements.join("\n");
        substitute(&self.template, &[(RENDERERS_PLACEHOLDER, elements.as_str())])
    }
}

/// Render every renderer into one Markdown report written to `output_file`.
#[tracing::instrument(skip(renderers))]
pub fn render_markdown(
    renderers: &mut [Box<dyn Renderer>],
    output_file: &Path,
    template_path: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(parent) = output_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let page_template = template_path.map(fs::read_to_string).transpose()?;
    let mut document = MarkdownPage::new(page_template.as_deref())?;

    for renderer in renderers.iter_mut() {
        let md = renderer.generate_markdown(output_file)?;
        document.with_element(&md);
    }

    fs::write(output_file, document.embed())?;
    tracing::debug!(path = %output_file.display(), "report written");
    Ok(output_file.to_path_buf())
}

//! Template resolution and dumping.

use super::builtin::{get_builtin, list_builtins, DEFAULT_TEMPLATE};
use super::Template;
use crate::error::{RenderError, Result};
use crate::filesystem::{FileSystem, LocalFileSystem};
use crate::models::TemplateSpec;
use crate::registry::Registry;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Registry of named templates that requests are resolved against.
///
/// [`TemplateCatalog::builtin`] holds the built-in templates. Additional
/// templates can be registered and are then resolvable by name too.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl TemplateCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self { templates: Vec::new() }
    }

    /// Names of the built-in templates, in registry order
    pub fn builtin_names() -> Vec<&'static str> {
        list_builtins()
    }

    /// A fresh copy of the built-in template `name`
    pub fn get_builtin(name: &str) -> Option<Template> {
        get_builtin(name)
    }

    /// Create a catalog holding every built-in template
    pub fn builtin() -> Self {
        Self { templates: list_builtins().into_iter().filter_map(get_builtin).collect() }
    }

    /// Register a template, replacing any existing one with the same name.
    pub fn register(&mut self, template: Template) {
        match self.templates.iter_mut().find(|t| t.name() == template.name()) {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
    }

    /// Resolve a template request against the local filesystem.
    ///
    /// See [`TemplateCatalog::resolve_with_fs`].
    pub fn resolve(
        &self,
        template: Option<&TemplateSpec>,
        template_dir: Option<&Path>,
    ) -> Result<Template> {
        self.resolve_with_fs(template, template_dir, &LocalFileSystem)
    }

    /// Resolve a template request.
    ///
    /// Resolution order:
    /// 1. An instance is returned as-is
    /// 2. `None` means the default `linear` template
    /// 3. A name is looked up as a file: `template_dir/name`, then
    ///    `template_dir/name.json`, then `name` relative to the working directory
    /// 4. Otherwise the name must exactly match a registered template
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::TemplateNotFound`] if nothing matches, or an
    /// I/O, JSON or [`RenderError::BadTemplate`] error if the file is unusable.
    #[tracing::instrument(skip(self, fs))]
    pub fn resolve_with_fs(
        &self,
        template: Option<&TemplateSpec>,
        template_dir: Option<&Path>,
        fs: &dyn FileSystem,
    ) -> Result<Template> {
        let name = match template {
            Some(TemplateSpec::Instance(instance)) => return Ok(instance.clone()),
            Some(TemplateSpec::Named(name)) => name.as_str(),
            None => DEFAULT_TEMPLATE,
        };

        if let Some(path) = find_template(name, template_dir, fs) {
            debug!(path = %path.display(), "loading template file");
            let text = fs.read_to_string(&path)?;
            return Template::from_json_str(name, &text);
        }

        match self.get(name) {
            Some(found) => {
                debug!(name, "using registered template");
                Ok(found.clone())
            }
            None => Err(RenderError::TemplateNotFound(name.to_string())),
        }
    }

    /// Write templates as `<name>.json` files into `output`.
    ///
    /// With `targets`, only the named templates are written. Files that
    /// already exist with identical content are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::TemplateContentMismatch`] if a target file exists
    /// with different content. It is never overwritten.
    #[tracing::instrument(skip(self))]
    pub fn dump(&self, output: &Path, targets: Option<&[&str]>) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(output)?;

        let selected = self.templates.iter().filter(|t| match targets {
            Some(names) => names.iter().any(|n| *n == t.name()),
            None => true,
        });

        let mut paths = Vec::new();
        for template in selected {
            let path = output.join(template.filename());
            let expected = template.to_file_content()?;

            if path.exists() {
                let current = fs::read_to_string(&path)?;
                if current != expected {
                    return Err(RenderError::TemplateContentMismatch {
                        name: template.name().to_string(),
                        path: path.display().to_string(),
                    });
                }
                debug!(path = %path.display(), "template unchanged");
            } else {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&path, expected)?;
                debug!(path = %path.display(), "template written");
            }
            paths.push(path);
        }
        Ok(paths)
    }
}

impl Registry<Template> for TemplateCatalog {
    fn get(&self, name: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.name() == name)
    }

    fn len(&self) -> usize {
        self.templates.len()
    }

    fn names(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.templates.iter().map(|t| t.name()))
    }
}

/// Locate a template file for `name`.
///
/// Only exact paths are tried; `bar` never matches `bar_template.json`.
pub fn find_template(
    name: &str,
    template_dir: Option<&Path>,
    fs: &dyn FileSystem,
) -> Option<PathBuf> {
    if let Some(dir) = template_dir {
        let path = dir.join(name);
        if fs.exists(&path) {
            return Some(path);
        }
        let with_extension = dir.join(format!("{}.{}", name, super::EXTENSION));
        if fs.exists(&with_extension) {
            return Some(with_extension);
        }
    }

    let path = PathBuf::from(name);
    if fs.exists(&path) {
        return Some(path);
    }
    None
}

/// Resolve a template request against the built-in catalog.
pub fn get_template(template: Option<&TemplateSpec>, template_dir: Option<&Path>) -> Result<Template> {
    TemplateCatalog::builtin().resolve(template, template_dir)
}

/// Write the built-in templates (or the `targets` subset) into `output`.
pub fn dump_templates(output: &Path, targets: Option<&[&str]>) -> Result<Vec<PathBuf>> {
    TemplateCatalog::builtin().dump(output, targets)
}

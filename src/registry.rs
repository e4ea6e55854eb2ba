//! Lookup of templates by name.

/// Named storage that templates are resolved against.
///
/// ```
/// use plotrender::registry::Registry;
/// use plotrender::templates::TemplateCatalog;
///
/// let catalog = TemplateCatalog::builtin();
/// assert!(catalog.contains("linear"));
/// assert_eq!(catalog.get("scatter").map(|t| t.name()), Some("scatter"));
/// ```
pub trait Registry<V> {
    /// Whether a template is registered under `name`
    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The template registered under `name`, matched exactly
    fn get(&self, name: &str) -> Option<&V>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered names, in registration order
    fn names(&self) -> Box<dyn Iterator<Item = &str> + '_>;
}

//! Encoding palettes for revisions and series.
//!
//! Fixed, ordered ranges assigned positionally to a sorted domain. When the
//! domain is longer than a palette, the palette wraps around from the start.

use serde_json::{json, Value};

/// Line colors, one per revision
pub const COLORS: &[&str] =
    &["#945dd6", "#13adc7", "#f46837", "#48bb78", "#4299e1", "#ed8936", "#f56565"];

/// Stroke dash patterns, one per series
pub const STROKE_DASHES: &[[u32; 2]] = &[[1, 0], [8, 8], [8, 4], [4, 4], [4, 2], [2, 1], [1, 1]];

/// Point shapes, one per series
pub const SHAPES: &[&str] = &["square", "circle", "triangle", "diamond"];

/// List of all available palette names.
const PALETTE_NAMES: &[&str] = &["color", "stroke_dash", "shape"];

/// Returns a list of all available palette names.
pub fn list_palettes() -> Vec<&'static str> {
    PALETTE_NAMES.to_vec()
}

/// Returns the full palette for an encoding anchor, or None if it has none.
pub fn get_palette(name: &str) -> Option<Vec<Value>> {
    match name {
        "color" => Some(COLORS.iter().map(|c| json!(c)).collect()),
        "stroke_dash" => Some(STROKE_DASHES.iter().map(|d| json!(d)).collect()),
        "shape" => Some(SHAPES.iter().map(|s| json!(s)).collect()),
        _ => None,
    }
}

/// Repeat `palette` until it covers `len` entries.
///
/// ```
/// use plotrender::palettes::cycle_range;
///
/// assert_eq!(cycle_range(&[1, 2, 3], 5), vec![1, 2, 3, 1, 2]);
/// assert_eq!(cycle_range(&[1, 2, 3], 2), vec![1, 2]);
/// ```
pub fn cycle_range<T: Clone>(palette: &[T], len: usize) -> Vec<T> {
    palette.iter().cycle().take(len).cloned().collect()
}

/// Range for a domain of `len` values using the named palette.
pub fn range_for(name: &str, len: usize) -> Option<Vec<Value>> {
    get_palette(name).map(|palette| cycle_range(&palette, len))
}

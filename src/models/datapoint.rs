//! Datapoint rows and helpers for reading their values.

use serde_json::{Map, Value};

/// One observed row: field name -> scalar value.
///
/// Key order is preserved into the filled template's data array.
pub type Datapoint = Map<String, Value>;

/// Field holding the revision identifier of a datapoint
pub const REV_FIELD: &str = "rev";

/// Render a scalar datapoint value as plain text.
///
/// Strings are returned without quotes; numbers and booleans use their JSON
/// form. Returns `None` for null and container values.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Collect the distinct `rev` values of `datapoints` in order of first appearance.
pub fn distinct_revs(datapoints: &[Datapoint]) -> Vec<String> {
    let mut revs: Vec<String> = Vec::new();
    for rev in datapoints.iter().filter_map(|d| d.get(REV_FIELD)).filter_map(scalar_text) {
        if !revs.contains(&rev) {
            revs.push(rev);
        }
    }
    revs
}

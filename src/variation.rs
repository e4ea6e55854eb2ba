//! Series variation: which dimensions tell the plotted series apart.
//!
//! Given the `(source, field)` definitions of a plot, [`SeriesVariation::resolve`]
//! works out whether series differ by source, by field, or by both. The result
//! drives the grouping keys and stroke/shape encodings, and decides how each
//! datapoint is annotated before it is embedded in the template.
//!
//! Preference when picking varied keys:
//! 1. A dimension whose distinct-value count equals the number of series
//!    identifies every series on its own and is used alone. If both qualify,
//!    `source` wins over `field` (dimension names compared in reverse order).
//! 2. Otherwise every dimension with more than one distinct value is used,
//!    joined into the composite `filename::field` key.

use crate::models::{scalar_text, Datapoint, Dimension, SeriesDefinition, REV_FIELD};
use std::collections::BTreeSet;

/// Separator for composite keys and pivot expressions
pub const FIELD_SEPARATOR: &str = "::";

/// Varied dimensions and the sorted domain of series identities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesVariation {
    /// Dimensions that distinguish the series, in composite-key order
    pub varied_keys: Vec<Dimension>,
    /// Sorted distinct series identities along the varied keys
    pub domain: Vec<String>,
}

impl SeriesVariation {
    /// Resolve the variation of `definitions`.
    pub fn resolve(definitions: &[SeriesDefinition]) -> Self {
        if definitions.len() <= 1 {
            return Self::default();
        }

        let distinct: Vec<(Dimension, BTreeSet<&str>)> = Dimension::ALL
            .iter()
            .map(|&dim| (dim, definitions.iter().map(|d| d.value(dim)).collect()))
            .collect();

        let mut identifying: Vec<Dimension> = distinct
            .iter()
            .filter(|(_, values)| values.len() == definitions.len())
            .map(|(dim, _)| *dim)
            .collect();
        identifying.sort_by(|a, b| b.as_str().cmp(a.as_str()));

        let varied_keys: Vec<Dimension> = match identifying.first() {
            Some(&dim) => vec![dim],
            None => distinct
                .iter()
                .filter(|(_, values)| values.len() > 1)
                .map(|(dim, _)| *dim)
                .collect(),
        };

        let domain = match varied_keys.as_slice() {
            [] => Vec::new(),
            [dim] => distinct
                .iter()
                .find(|(d, _)| d == dim)
                .map(|(_, values)| values.iter().map(|v| v.to_string()).collect())
                .unwrap_or_default(),
            _ => definitions
                .iter()
                .map(|d| format!("{}{}{}", d.source, FIELD_SEPARATOR, d.field))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        };

        tracing::debug!(?varied_keys, ?domain, "resolved series variation");
        Self { varied_keys, domain }
    }

    /// Whether any dimension distinguishes the series
    pub fn is_varied(&self) -> bool {
        !self.varied_keys.is_empty()
    }

    /// Datapoint key carrying the series identity.
    ///
    /// The varying dimension's own key, or `filename::field` when both vary.
    pub fn concat_field(&self) -> Option<String> {
        if self.varied_keys.is_empty() {
            return None;
        }
        let keys: Vec<&str> = self.varied_keys.iter().map(|d| d.datapoint_key()).collect();
        Some(keys.join(FIELD_SEPARATOR))
    }

    /// Fields every line is grouped by: `rev`, then the series identity.
    pub fn grouping_keys(&self) -> Vec<String> {
        let mut keys = vec![REV_FIELD.to_string()];
        keys.extend(self.concat_field());
        keys
    }

    /// Reshape datapoints to carry only the fields the encodings use.
    ///
    /// Dimensions that do not vary are removed. When both vary, each row
    /// gains the composite `filename::field` value and loses the originals.
    pub fn annotate(&self, datapoints: &mut [Datapoint]) {
        let composite = self.varied_keys.len() > 1;
        for datapoint in datapoints.iter_mut() {
            if composite {
                let parts: Option<Vec<String>> = self
                    .varied_keys
                    .iter()
                    .map(|d| datapoint.get(d.datapoint_key()).and_then(scalar_text))
                    .collect();
                if let (Some(parts), Some(key)) = (parts, self.concat_field()) {
                    datapoint.insert(key, parts.join(FIELD_SEPARATOR).into());
                }
            }
            for dim in Dimension::ALL {
                if composite || !self.varied_keys.contains(&dim) {
                    datapoint.remove(dim.datapoint_key());
                }
            }
        }
    }
}

//! Optional anchors: encodings derived from revisions and series variation.
//!
//! Templates may declare any subset of [`OPTIONAL_ANCHORS`]. Each declared
//! anchor is handled at most once per pass: it is either substituted in
//! place or split out to the caller, and then leaves the pending set.

use crate::models::{distinct_revs, Datapoint, Properties, REV_FIELD};
use crate::palettes::range_for;
use crate::templates::{FillPass, Template};
use crate::variation::{SeriesVariation, FIELD_SEPARATOR};
use serde_json::{json, Value};
use std::collections::BTreeSet;

/// Anchors a template may declare beyond the required ones
pub const OPTIONAL_ANCHORS: &[&str] = &[
    "color",
    "group_by",
    "group_by_x",
    "group_by_y",
    "pivot_field",
    "plot_height",
    "plot_width",
    "row",
    "shape",
    "stroke_dash",
    "zoom_and_pan",
];

/// Optional anchors that still need handling in the current pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingAnchors {
    names: BTreeSet<&'static str>,
}

impl PendingAnchors {
    /// Optional anchors the template actually declares
    pub fn declared_by(template: &Template) -> Self {
        let names = OPTIONAL_ANCHORS.iter().copied().filter(|n| template.has_anchor(n)).collect();
        Self { names }
    }

    /// Remove `name`, returning whether it was pending.
    pub fn take(&mut self, name: &str) -> bool {
        self.names.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Take every remaining anchor, leaving the set empty
    pub fn drain(&mut self) -> Vec<&'static str> {
        std::mem::take(&mut self.names).into_iter().collect()
    }
}

/// Legend styling attached to series encodings
fn series_legend() -> Value {
    json!({"symbolFillColor": "transparent", "symbolStrokeColor": "grey"})
}

/// Reference `key` on `datum` in a Vega expression.
fn datum_ref(key: &str) -> String {
    let plain = !key.is_empty()
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !key.starts_with(|c: char| c.is_ascii_digit());
    if plain {
        format!("datum.{}", key)
    } else {
        format!("datum['{}']", key.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}

/// Expression joining each key's value with a `'::'` literal.
pub fn pivot_expression(keys: &[String]) -> String {
    let separator = format!(" + '{}' + ", FIELD_SEPARATOR);
    keys.iter().map(|k| datum_ref(k)).collect::<Vec<_>>().join(&separator)
}

/// Scale encoding mapping `field` over `domain` onto the named palette.
pub fn scale_encoding(name: &str, field: &str, domain: &[String]) -> Value {
    let range = range_for(name, domain.len()).unwrap_or_default();
    let mut encoding = json!({
        "field": field,
        "scale": {"domain": domain, "range": range}
    });
    if name != "color" {
        encoding["legend"] = series_legend();
    }
    encoding
}

/// Fills the optional anchors of one pass from the renderer properties.
#[derive(Debug)]
pub struct OptionalEncodingFiller<'a> {
    properties: &'a Properties,
}

impl<'a> OptionalEncodingFiller<'a> {
    pub fn new(properties: &'a Properties) -> Self {
        Self { properties }
    }

    /// Fill every optional anchor the template declares.
    ///
    /// Datapoints are reshaped to match the series encodings, so this must
    /// run before the `data` anchor is filled. Returns the resolved variation.
    pub fn fill(&self, pass: &mut FillPass<'_>, datapoints: &mut [Datapoint]) -> SeriesVariation {
        let mut pending = PendingAnchors::declared_by(pass.template());
        if pending.is_empty() {
            return SeriesVariation::default();
        }

        self.fill_color(pass, &mut pending, datapoints);
        self.fill_fixed(pass, &mut pending);

        let variation = SeriesVariation::resolve(&self.properties.anchors_y_definitions);
        self.fill_grouping(pass, &mut pending, &variation);

        if variation.is_varied() {
            self.fill_series(pass, &mut pending, &variation);
        }
        // Nothing distinguishes the series: leave those encodings empty
        for name in pending.drain() {
            pass.apply(name, json!({}));
        }

        variation.annotate(datapoints);
        variation
    }

    /// Revision colors over the caller's revisions, so the legend is stable.
    fn fill_color(&self, pass: &mut FillPass<'_>, pending: &mut PendingAnchors, data: &[Datapoint]) {
        if !pending.take("color") {
            return;
        }
        let revs = match &self.properties.revs_with_datapoints {
            Some(revs) => revs.clone(),
            None => distinct_revs(data),
        };
        pass.apply("color", scale_encoding("color", REV_FIELD, &revs));
    }

    /// Anchors whose values do not depend on the data.
    fn fill_fixed(&self, pass: &mut FillPass<'_>, pending: &mut PendingAnchors) {
        if pending.take("zoom_and_pan") {
            pass.apply("zoom_and_pan", json!({"name": "grid", "select": "interval", "bind": "scales"}));
        }
        if pending.take("plot_width") {
            pass.apply("plot_width", json!(self.properties.plot_width()));
        }
        if pending.take("plot_height") {
            pass.apply("plot_height", json!(self.properties.plot_height()));
        }
    }

    fn fill_grouping(
        &self,
        pass: &mut FillPass<'_>,
        pending: &mut PendingAnchors,
        variation: &SeriesVariation,
    ) {
        let keys = variation.grouping_keys();

        if pending.take("group_by") {
            pass.apply("group_by", json!(keys));
        }
        for (name, axis) in [("group_by_x", &self.properties.x), ("group_by_y", &self.properties.y)] {
            if !pending.take(name) {
                continue;
            }
            let mut axis_keys = keys.clone();
            axis_keys.extend(axis.as_deref().map(Template::escape_special_characters));
            pass.apply(name, json!(axis_keys));
        }
        if pending.take("pivot_field") {
            pass.apply("pivot_field", json!(pivot_expression(&keys)));
        }
    }

    fn fill_series(
        &self,
        pass: &mut FillPass<'_>,
        pending: &mut PendingAnchors,
        variation: &SeriesVariation,
    ) {
        let Some(field) = variation.concat_field() else {
            return;
        };

        if pending.take("row") {
            pass.apply("row", json!({"field": field}));
        }
        for name in ["stroke_dash", "shape"] {
            if pending.take(name) {
                pass.apply(name, scale_encoding(name, &field, &variation.domain));
            }
        }
    }
}

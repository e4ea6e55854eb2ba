//! Built-in Vega-Lite template definitions.
//!
//! Each built-in is a static JSON document parameterized entirely through
//! anchors. They can be referenced by name when resolving a template.

use super::Template;
use serde_json::{json, Value};

/// Vega-Lite schema every built-in declares
const SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Name of the template used when none is requested.
pub const DEFAULT_TEMPLATE: &str = "linear";

/// List of all available built-in template names, in registry order.
const BUILTIN_NAMES: &[&str] = &[
    "simple",
    "linear",
    "confusion",
    "confusion_normalized",
    "scatter",
    "scatter_jitter",
    "smooth",
    "bar_horizontal_sorted",
    "bar_horizontal",
];

/// Returns a list of all available built-in template names.
pub fn list_builtins() -> Vec<&'static str> {
    BUILTIN_NAMES.to_vec()
}

/// Returns a fresh built-in template by name, or None if not found.
///
/// Names match exactly; there is no prefix or case-insensitive matching.
pub fn get_builtin(name: &str) -> Option<Template> {
    let content = match name {
        "simple" => simple(),
        "linear" => linear(),
        "confusion" => confusion(),
        "confusion_normalized" => confusion_normalized(),
        "scatter" => scatter(),
        "scatter_jitter" => scatter_jitter(),
        "smooth" => smooth(),
        "bar_horizontal_sorted" => bar_horizontal(true),
        "bar_horizontal" => bar_horizontal(false),
        _ => return None,
    };
    Some(Template::from_builtin(name, content))
}

fn a(name: &str) -> String {
    Template::anchor(name)
}

/// Single line per revision with a data tooltip.
fn simple() -> Value {
    json!({
        "$schema": SCHEMA,
        "data": {"values": a("data")},
        "title": a("title"),
        "width": a("plot_width"),
        "height": a("plot_height"),
        "params": [a("zoom_and_pan")],
        "mark": {"type": "line", "tooltip": {"content": "data"}},
        "encoding": {
            "x": {"field": a("x"), "type": "quantitative", "title": a("x_label")},
            "y": {
                "field": a("y"),
                "type": "quantitative",
                "title": a("y_label"),
                "scale": {"zero": false}
            },
            "color": a("color"),
            "strokeDash": a("stroke_dash")
        }
    })
}

/// Lines with points on hover and a rule tooltip listing every series at x.
fn linear() -> Value {
    json!({
        "$schema": SCHEMA,
        "data": {"values": a("data")},
        "title": a("title"),
        "width": a("plot_width"),
        "height": a("plot_height"),
        "layer": [
            {
                "layer": [
                    {"params": [a("zoom_and_pan")], "mark": "line"},
                    {
                        "transform": [{"filter": {"param": "hover", "empty": false}}],
                        "mark": "point"
                    }
                ],
                "encoding": {
                    "x": {"field": a("x"), "type": "quantitative", "title": a("x_label")},
                    "y": {
                        "field": a("y"),
                        "type": "quantitative",
                        "title": a("y_label"),
                        "scale": {"zero": false}
                    },
                    "color": a("color"),
                    "strokeDash": a("stroke_dash")
                }
            },
            {
                "transform": [
                    {"calculate": a("pivot_field"), "as": "pivot_field"},
                    {"pivot": "pivot_field", "value": a("y"), "groupby": [a("x")]}
                ],
                "mark": {"type": "rule", "tooltip": {"content": "data"}, "stroke": "grey"},
                "encoding": {
                    "x": {"field": a("x"), "type": "quantitative"},
                    "opacity": {
                        "condition": {"value": 0.3, "param": "hover", "empty": false},
                        "value": 0
                    }
                },
                "params": [{
                    "name": "hover",
                    "select": {
                        "type": "point",
                        "fields": [a("x")],
                        "nearest": true,
                        "on": "mouseover",
                        "clear": "mouseout"
                    }
                }]
            }
        ]
    })
}

/// Confusion matrix transforms shared by the raw and normalized variants.
fn confusion_transforms(ratio: Value) -> Value {
    let mut transforms = json!([
        {
            "aggregate": [{"op": "count", "as": "xy_count"}],
            "groupby": [a("y"), a("x")]
        },
        {
            "impute": "xy_count",
            "groupby": a("group_by_y"),
            "key": a("x"),
            "value": 0
        },
        {
            "impute": "xy_count",
            "groupby": a("group_by_x"),
            "key": a("y"),
            "value": 0
        }
    ]);
    if let (Value::Array(list), Value::Array(extra)) = (&mut transforms, ratio) {
        list.extend(extra);
    }
    transforms
}

/// Confusion matrix layers: heat cells, hover highlight, and count labels.
fn confusion_layers(color_field: &str, scale: Value, tooltip: Value, text_test: &str) -> Value {
    json!([
        {
            "mark": "rect",
            "width": a("plot_width"),
            "height": a("plot_height"),
            "encoding": {
                "color": {
                    "field": color_field,
                    "type": "quantitative",
                    "title": "",
                    "scale": scale
                }
            }
        },
        {
            "params": [{
                "name": "label",
                "select": {
                    "type": "point",
                    "on": "mouseover",
                    "encodings": ["x", "y"],
                    "clear": "mouseout"
                }
            }],
            "mark": "rect",
            "encoding": {
                "tooltip": [
                    {"field": a("x"), "type": "nominal"},
                    {"field": a("y"), "type": "nominal"},
                    tooltip
                ],
                "opacity": {
                    "condition": {"param": "label", "empty": false, "value": 1},
                    "value": 0
                }
            }
        },
        {
            "transform": [{"filter": {"param": "label", "empty": false}}],
            "layer": [{"mark": {"type": "rect", "color": "lightpink"}}]
        },
        {
            "mark": "text",
            "encoding": {
                "text": {"field": "xy_count"},
                "color": {
                    "condition": {"test": text_test, "value": "white"},
                    "value": "black"
                }
            }
        }
    ])
}

fn confusion_encoding() -> Value {
    json!({
        "x": {
            "field": a("x"),
            "type": "nominal",
            "sort": "ascending",
            "title": a("x_label")
        },
        "y": {
            "field": a("y"),
            "type": "nominal",
            "sort": "ascending",
            "title": a("y_label")
        }
    })
}

/// Confusion matrix of raw counts, one facet column per revision.
fn confusion() -> Value {
    let ratio = json!([
        {
            "joinaggregate": [{"op": "max", "field": "xy_count", "as": "max_count"}],
            "groupby": []
        },
        {"calculate": "datum.xy_count / datum.max_count", "as": "percent_of_max"}
    ]);
    json!({
        "$schema": SCHEMA,
        "data": {"values": a("data")},
        "title": a("title"),
        "facet": {"column": {"field": "rev", "sort": []}, "row": a("row")},
        "spec": {
            "transform": confusion_transforms(ratio),
            "encoding": confusion_encoding(),
            "layer": confusion_layers(
                "xy_count",
                json!({"domainMin": 0, "nice": true}),
                json!({"field": "xy_count", "type": "quantitative"}),
                "datum.percent_of_max > 0.5",
            )
        }
    })
}

/// Confusion matrix normalized per actual class.
fn confusion_normalized() -> Value {
    let ratio = json!([
        {
            "joinaggregate": [{"op": "sum", "field": "xy_count", "as": "sum_y"}],
            "groupby": [a("y")]
        },
        {"calculate": "datum.xy_count / datum.sum_y", "as": "percent_of_y"}
    ]);
    json!({
        "$schema": SCHEMA,
        "data": {"values": a("data")},
        "title": a("title"),
        "facet": {"column": {"field": "rev", "sort": []}, "row": a("row")},
        "spec": {
            "transform": confusion_transforms(ratio),
            "encoding": confusion_encoding(),
            "layer": confusion_layers(
                "percent_of_y",
                json!({"domain": [0, 1]}),
                json!({"field": "percent_of_y", "type": "quantitative", "format": ".2f"}),
                "datum.percent_of_y > 0.5",
            )
        }
    })
}

fn scatter() -> Value {
    json!({
        "$schema": SCHEMA,
        "data": {"values": a("data")},
        "title": a("title"),
        "width": a("plot_width"),
        "height": a("plot_height"),
        "params": [a("zoom_and_pan")],
        "mark": {"type": "point", "tooltip": {"content": "data"}},
        "encoding": {
            "x": {"field": a("x"), "type": "quantitative", "title": a("x_label")},
            "y": {
                "field": a("y"),
                "type": "quantitative",
                "title": a("y_label"),
                "scale": {"zero": false}
            },
            "color": a("color"),
            "shape": a("shape")
        }
    })
}

/// Scatter with random offsets, for overlapping categorical values.
fn scatter_jitter() -> Value {
    json!({
        "$schema": SCHEMA,
        "data": {"values": a("data")},
        "title": a("title"),
        "width": a("plot_width"),
        "height": a("plot_height"),
        "transform": [
            {"calculate": "random()", "as": "randomX"},
            {"calculate": "random()", "as": "randomY"}
        ],
        "mark": {"type": "point", "tooltip": {"content": "data"}},
        "encoding": {
            "x": {"field": a("x"), "title": a("x_label")},
            "y": {"field": a("y"), "title": a("y_label")},
            "color": a("color"),
            "shape": a("shape"),
            "xOffset": {"field": "randomX", "type": "quantitative"},
            "yOffset": {"field": "randomY", "type": "quantitative"}
        }
    })
}

/// Loess-smoothed lines over the raw lines, with a bandwidth slider.
fn smooth() -> Value {
    let x = json!({"field": a("x"), "type": "quantitative", "title": a("x_label")});
    let y = json!({
        "field": a("y"),
        "type": "quantitative",
        "title": a("y_label"),
        "scale": {"zero": false}
    });
    json!({
        "$schema": SCHEMA,
        "data": {"values": a("data")},
        "title": a("title"),
        "width": a("plot_width"),
        "height": a("plot_height"),
        "params": [{
            "name": "smooth",
            "value": 0.001,
            "bind": {"input": "range", "min": 0.001, "max": 1, "step": 0.001}
        }],
        "layer": [
            {
                "mark": "line",
                "encoding": {
                    "x": x,
                    "y": y,
                    "color": a("color"),
                    "strokeDash": a("stroke_dash"),
                    "tooltip": [
                        {"field": a("x"), "title": a("x_label"), "type": "quantitative"},
                        {"field": a("y"), "title": a("y_label"), "type": "quantitative"}
                    ]
                },
                "transform": [{
                    "loess": a("y"),
                    "on": a("x"),
                    "groupby": a("group_by"),
                    "bandwidth": {"signal": "smooth"}
                }]
            },
            {
                "mark": {"type": "line", "opacity": 0.2},
                "encoding": {
                    "x": x,
                    "y": y,
                    "color": a("color"),
                    "strokeDash": a("stroke_dash")
                }
            },
            {
                "mark": {"type": "circle", "size": 10, "tooltip": {"content": "encoding"}},
                "encoding": {
                    "x": {
                        "aggregate": "max",
                        "field": a("x"),
                        "type": "quantitative",
                        "title": a("x_label")
                    },
                    "y": {
                        "aggregate": {"argmax": a("x")},
                        "field": a("y"),
                        "type": "quantitative",
                        "title": a("y_label"),
                        "scale": {"zero": false}
                    },
                    "color": a("color")
                }
            }
        ]
    })
}

/// Horizontal bars, one offset bar per revision.
fn bar_horizontal(sorted: bool) -> Value {
    let mut y = json!({"field": a("y"), "type": "nominal", "title": a("y_label")});
    if sorted {
        y["sort"] = json!("-x");
    }
    json!({
        "$schema": SCHEMA,
        "data": {"values": a("data")},
        "title": a("title"),
        "width": a("plot_width"),
        "height": a("plot_height"),
        "mark": {"type": "bar"},
        "encoding": {
            "x": {
                "field": a("x"),
                "type": "quantitative",
                "title": a("x_label"),
                "scale": {"zero": false}
            },
            "y": y,
            "yOffset": {"field": "rev", "sort": []},
            "color": a("color")
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_builtins() {
        let builtins = list_builtins();
        assert_eq!(builtins.len(), 9);
        assert!(builtins.contains(&DEFAULT_TEMPLATE));
        assert!(builtins.contains(&"confusion_normalized"));
        assert!(builtins.contains(&"bar_horizontal_sorted"));
    }

    #[test]
    fn test_every_builtin_receives_data() {
        for name in list_builtins() {
            let template = get_builtin(name).expect("all listed builtins should exist");
            assert_eq!(template.name(), name);
            assert!(template.content().is_object(), "{} should be an object", name);
            assert!(template.has_anchor("data"), "{} should use the data anchor", name);
            assert!(template.has_anchor("x"), "{} should use the x anchor", name);
            assert!(template.has_anchor("y"), "{} should use the y anchor", name);
        }
    }

    #[test]
    fn test_get_builtin_nonexistent() {
        assert!(get_builtin("nonexistent").is_none());
        assert!(get_builtin("").is_none());
        assert!(get_builtin("Linear").is_none()); // case-sensitive
        assert!(get_builtin("lin").is_none()); // no prefix matching
    }

    #[test]
    fn test_sorted_bar_sorts_by_x() {
        let sorted = get_builtin("bar_horizontal_sorted").unwrap();
        let plain = get_builtin("bar_horizontal").unwrap();
        assert_eq!(sorted.content()["encoding"]["y"]["sort"], "-x");
        assert!(plain.content()["encoding"]["y"].get("sort").is_none());
    }

    #[test]
    fn test_confusion_uses_axis_groupings() {
        let template = get_builtin("confusion").unwrap();
        assert!(template.has_anchor("group_by_x"));
        assert!(template.has_anchor("group_by_y"));
        assert!(template.has_anchor("row"));
        assert!(!template.has_anchor("stroke_dash"));
    }
}

//! Integration tests for filling Vega-Lite templates
//!
//! These tests render datapoints through the built-in templates and check
//! the resulting specification and split-out anchor values.

use plotrender::models::{Datapoint, Properties, SeriesDefinition};
use plotrender::templates::{Template, TemplateCatalog};
use plotrender::{RenderError, VegaRenderer};
use serde_json::{json, Value};

/// Build datapoints from a JSON array of objects
fn rows(values: Value) -> Vec<Datapoint> {
    values
        .as_array()
        .expect("rows should be an array")
        .iter()
        .map(|v| v.as_object().cloned().expect("row should be an object"))
        .collect()
}

/// Route render logs to the test harness output
fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn series(pairs: &[(&str, &str)]) -> Vec<SeriesDefinition> {
    pairs.iter().map(|(s, f)| SeriesDefinition::new(*s, *f)).collect()
}

#[test]
fn test_simple_plot_keeps_datapoint_order() {
    let data = rows(json!([
        {"rev": "HEAD", "first_val": 100, "second_val": 100},
        {"rev": "HEAD", "first_val": 200, "second_val": 300},
    ]));
    let props = Properties::new()
        .with_template("simple")
        .with_x("first_val")
        .with_y("second_val")
        .with_title("TITLE");
    let mut renderer = VegaRenderer::new(data, "foo", props);
    let content = renderer.get_filled_template(&[], true).unwrap().content;

    assert_eq!(content["title"], "TITLE");
    assert_eq!(content["encoding"]["x"]["field"], "first_val");
    assert_eq!(content["encoding"]["y"]["field"], "second_val");
    assert_eq!(content["encoding"]["x"]["title"], "first_val");
    assert_eq!(
        content["data"]["values"],
        json!([
            {"rev": "HEAD", "first_val": 100, "second_val": 100},
            {"rev": "HEAD", "first_val": 200, "second_val": 300},
        ])
    );
    assert_eq!(content["width"], 300);
    assert_eq!(content["params"][0]["bind"], "scales");
    assert_eq!(content["encoding"]["strokeDash"], json!({}));
}

#[test]
fn test_default_template_is_linear() {
    let data = rows(json!([{"rev": "HEAD", "x": 1, "y": 2}]));
    let props = Properties::new().with_x("x").with_y("y");
    let mut renderer = VegaRenderer::new(data, "plot", props);
    let content = renderer.get_filled_template(&[], true).unwrap().content;

    let encoding = &content["layer"][0]["encoding"];
    assert_eq!(encoding["x"]["field"], "x");
    assert_eq!(encoding["y"]["field"], "y");
    assert_eq!(encoding["color"]["field"], "rev");
    assert_eq!(content["layer"][1]["transform"][0]["calculate"], "datum.rev");
    assert_eq!(content["layer"][1]["transform"][1]["groupby"], json!(["x"]));
}

#[test]
fn test_confusion_groups_by_both_axes() {
    let data = rows(json!([
        {"rev": "HEAD", "predicted": "B", "actual": "A"},
        {"rev": "HEAD", "predicted": "A", "actual": "A"},
    ]));
    let props = Properties::new()
        .with_template("confusion")
        .with_x("predicted")
        .with_y("actual");
    let mut renderer = VegaRenderer::new(data, "confusion", props);
    let content = renderer.get_filled_template(&[], true).unwrap().content;

    let transform = &content["spec"]["transform"];
    assert_eq!(transform[0]["groupby"], json!(["actual", "predicted"]));
    assert_eq!(transform[1]["groupby"], json!(["rev", "actual"]));
    assert_eq!(transform[2]["groupby"], json!(["rev", "predicted"]));
    assert_eq!(content["facet"]["row"], json!({}));
    assert_eq!(content["spec"]["encoding"]["x"]["field"], "predicted");
}

#[test]
fn test_source_variation_sets_dash_domain() {
    init_tracing();
    let data = rows(json!([
        {"rev": "HEAD", "filename": "test", "field": "acc", "step": 0, "acc": 0.5},
        {"rev": "HEAD", "filename": "train", "field": "acc", "step": 0, "acc": 0.7},
    ]));
    let props = Properties::new()
        .with_x("step")
        .with_y("acc")
        .with_y_definitions(series(&[("test", "acc"), ("train", "acc")]));
    let mut renderer = VegaRenderer::new(data, "acc", props);
    let content = renderer.get_filled_template(&[], true).unwrap().content;

    let dash = &content["layer"][0]["encoding"]["strokeDash"];
    assert_eq!(dash["field"], "filename");
    assert_eq!(dash["scale"]["domain"], json!(["test", "train"]));
    assert_eq!(dash["scale"]["range"], json!([[1, 0], [8, 8]]));
    assert_eq!(dash["legend"]["symbolStrokeColor"], "grey");

    assert_eq!(
        content["layer"][1]["transform"][0]["calculate"],
        "datum.rev + '::' + datum.filename"
    );
    let first = &content["data"]["values"][0];
    assert_eq!(first["filename"], "test");
    assert!(first.get("field").is_none());
    assert!(first.get("filename::field").is_none());
}

#[test]
fn test_both_dimensions_use_composite_field() {
    init_tracing();
    let data = rows(json!([
        {"rev": "HEAD", "filename": "train", "field": "acc", "step": 0, "value": 0.7},
        {"rev": "HEAD", "filename": "train", "field": "loss", "step": 0, "value": 0.3},
        {"rev": "HEAD", "filename": "test", "field": "acc", "step": 0, "value": 0.5},
    ]));
    let props = Properties::new()
        .with_template("scatter")
        .with_x("step")
        .with_y("value")
        .with_y_definitions(series(&[("train", "acc"), ("train", "loss"), ("test", "acc")]));
    let mut renderer = VegaRenderer::new(data, "mixed", props);
    let content = renderer.get_filled_template(&[], true).unwrap().content;

    let shape = &content["encoding"]["shape"];
    assert_eq!(shape["field"], "filename::field");
    assert_eq!(shape["scale"]["domain"], json!(["test::acc", "train::acc", "train::loss"]));
    assert_eq!(shape["scale"]["range"], json!(["square", "circle", "triangle"]));

    let values = content["data"]["values"].as_array().unwrap();
    assert_eq!(values[1]["filename::field"], "train::loss");
    assert!(values.iter().all(|v| v.get("filename").is_none() && v.get("field").is_none()));
}

#[test]
fn test_color_palette_cycles() {
    let revs: Vec<String> = (0..9).map(|i| format!("rev{}", i)).collect();
    let data = rows(json!([{"rev": "rev0", "x": 1, "y": 2}]));
    let props = Properties::new().with_template("simple").with_x("x").with_y("y").with_revs(revs);
    let mut renderer = VegaRenderer::new(data, "plot", props);
    let content = renderer.get_filled_template(&[], true).unwrap().content;

    let range = content["encoding"]["color"]["scale"]["range"].as_array().unwrap();
    assert_eq!(range.len(), 9);
    assert_eq!(range[7], "#945dd6");
    assert_eq!(range[8], "#13adc7");
    assert_eq!(content["encoding"]["color"]["scale"]["domain"][8], "rev8");
}

#[test]
fn test_strict_mode_checks_fields() {
    let data = rows(json!([{"x": 1, "value": 2}]));
    let props = Properties::new().with_x("x").with_y("y");

    let mut renderer = VegaRenderer::new(data.clone(), "plot", props.clone());
    let result = renderer.get_filled_template(&[], true);
    assert!(matches!(result, Err(RenderError::NoFieldInData(ref f)) if f == "y"));

    let mut lenient = VegaRenderer::new(data, "plot", props);
    let content = lenient.get_filled_template(&[], false).unwrap().content;
    assert_eq!(content["layer"][0]["encoding"]["y"]["field"], "y");
}

#[test]
fn test_template_without_data_anchor() {
    let template = Template::new("custom", json!({"mark": "line", "title": "<DVC_METRIC_TITLE>"}))
        .unwrap();
    let data = rows(json!([{"x": 1, "y": 2}]));
    let props = Properties::new().with_x("x").with_y("y").with_template(template);

    let mut renderer = VegaRenderer::new(data, "plot", props);
    let err = renderer.get_filled_template(&[], true).unwrap_err();
    assert!(matches!(err, RenderError::BadTemplate(_)));
    assert!(err.to_string().contains("<DVC_METRIC_DATA>"));

    let filled = renderer.get_filled_template(&["data"], true).unwrap();
    assert_eq!(filled.content["title"], "");
    assert_eq!(filled.split_content["<DVC_METRIC_DATA>"], json!([{"x": 1, "y": 2}]));
}

#[test]
fn test_partial_filled_template() {
    init_tracing();
    let data = rows(json!([{"rev": "HEAD", "x": 1, "y": 2}]));
    let props = Properties::new().with_x("x").with_y("y").with_title("Loss");
    let mut renderer = VegaRenderer::new(data, "plot", props);
    let (content, split) = renderer.get_partial_filled_template().unwrap();

    let content: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(content["title"], "<DVC_METRIC_TITLE>");
    assert_eq!(content["width"], "<DVC_METRIC_PLOT_WIDTH>");
    assert_eq!(content["data"]["values"], "<DVC_METRIC_DATA>");
    assert_eq!(content["layer"][0]["encoding"]["color"], "<DVC_METRIC_COLOR>");
    assert_eq!(content["layer"][0]["encoding"]["x"]["field"], "x");

    let definitions = &split["anchor_definitions"];
    assert_eq!(definitions["<DVC_METRIC_TITLE>"], "Loss");
    assert_eq!(definitions["<DVC_METRIC_PLOT_WIDTH>"], 300);
    assert_eq!(definitions["<DVC_METRIC_X_LABEL>"], "x");
    assert_eq!(definitions["<DVC_METRIC_COLOR>"]["scale"]["domain"], json!(["HEAD"]));
    assert_eq!(definitions["<DVC_METRIC_DATA>"][0]["y"], 2);
}

#[test]
fn test_registered_template_in_catalog() {
    let mut catalog = TemplateCatalog::builtin();
    catalog.register(
        Template::new(
            "bars",
            json!({"data": {"values": "<DVC_METRIC_DATA>"}, "x": "<DVC_METRIC_X>"}),
        )
        .unwrap(),
    );
    let data = rows(json!([{"a": 1}]));
    let props = Properties::new().with_template("bars").with_x("a");
    let mut renderer = VegaRenderer::with_catalog(data, "plot", props, &catalog).unwrap();
    let content = renderer.get_filled_template(&[], true).unwrap().content;

    assert_eq!(content, json!({"data": {"values": [{"a": 1}]}, "x": "a"}));
}

#[test]
fn test_unknown_template_fails_only_with_data() {
    let props = Properties::new().with_template("no_such_template");

    let mut empty = VegaRenderer::new(Vec::new(), "plot", props.clone());
    assert!(empty.get_filled_template(&[], true).unwrap().is_empty());

    let mut renderer = VegaRenderer::new(rows(json!([{"x": 1}])), "plot", props);
    let result = renderer.get_filled_template(&[], false);
    assert!(matches!(result, Err(RenderError::TemplateNotFound(ref n)) if n == "no_such_template"));
}

#[test]
fn test_data_anchor_inside_text_is_rejected() {
    let template =
        Template::new("embedded", json!({"data": {"values": "rows: <DVC_METRIC_DATA>"}})).unwrap();
    let data = rows(json!([{"x": 1, "y": 2}]));
    let props = Properties::new().with_x("x").with_y("y").with_template(template);

    let mut renderer = VegaRenderer::new(data, "plot", props);
    let err = renderer.get_filled_template(&[], true).unwrap_err();
    assert!(matches!(err, RenderError::BadTemplate(_)));
    assert!(err.to_string().contains("embedded"));
}

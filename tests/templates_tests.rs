//! Integration tests for template resolution and dumping
//!
//! Templates are written to temporary directories and resolved by name,
//! by file name, and relative to the working directory.

use plotrender::models::TemplateSpec;
use plotrender::templates::{dump_templates, get_template, list_builtins, Template};
use plotrender::RenderError;
use serde_json::json;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CUSTOM: &str = r#"{"data": {"values": "<DVC_METRIC_DATA>"}, "mark": "bar"}"#;

fn named(name: &str) -> TemplateSpec {
    TemplateSpec::from(name)
}

/// Sorted file names in a directory
fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("should read dir")
        .flatten()
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_builtin_by_name() {
    for name in list_builtins() {
        let template = get_template(Some(&named(name)), None).unwrap();
        assert_eq!(template.name(), name);
        assert!(template.has_anchor("data"), "{} has no data anchor", name);
    }
}

#[test]
fn test_instance_passes_through() {
    let template = Template::new("mine", json!({"mark": "line"})).unwrap();
    let resolved = get_template(Some(&TemplateSpec::from(template.clone())), None).unwrap();
    assert_eq!(resolved, template);
}

#[test]
fn test_template_dir_lookup() {
    let temp = TempDir::new().expect("should create temp dir");
    fs::write(temp.path().join("custom.json"), CUSTOM).expect("should write template");
    fs::write(temp.path().join("plain"), CUSTOM).expect("should write template");

    for name in ["custom", "custom.json", "plain"] {
        let template = get_template(Some(&named(name)), Some(temp.path())).unwrap();
        assert_eq!(template.content()["mark"], "bar", "{}", name);
    }

    let full_path = temp.path().join("custom.json");
    let template = get_template(Some(&named(&full_path.to_string_lossy())), None).unwrap();
    assert!(template.has_anchor("data"));
}

#[test]
fn test_file_shadows_builtin() {
    let temp = TempDir::new().expect("should create temp dir");
    fs::write(temp.path().join("simple.json"), CUSTOM).expect("should write template");

    let template = get_template(Some(&named("simple")), Some(temp.path())).unwrap();
    assert_eq!(template.content()["mark"], "bar");
}

#[test]
fn test_name_matching_is_exact() {
    let temp = TempDir::new().expect("should create temp dir");
    dump_templates(temp.path(), Some(&["bar_horizontal"][..])).unwrap();

    let result = get_template(Some(&named("bar")), Some(temp.path()));
    assert!(matches!(result, Err(RenderError::TemplateNotFound(ref n)) if n == "bar"));
}

#[test]
fn test_invalid_template_file() {
    let temp = TempDir::new().expect("should create temp dir");
    fs::write(temp.path().join("broken.json"), "{not json").expect("should write template");
    fs::write(temp.path().join("list.json"), "[1, 2]").expect("should write template");

    let broken = get_template(Some(&named("broken")), Some(temp.path()));
    assert!(matches!(broken, Err(RenderError::Json(_))));
    let list = get_template(Some(&named("list")), Some(temp.path()));
    assert!(matches!(list, Err(RenderError::BadTemplate(_))));
}

#[test]
#[serial]
fn test_relative_to_working_directory() {
    let temp = TempDir::new().expect("should create temp dir");
    fs::create_dir(temp.path().join("plots")).expect("should create dir");
    fs::write(temp.path().join("plots").join("mine.json"), CUSTOM).expect("should write template");

    let previous = env::current_dir().expect("should get cwd");
    env::set_current_dir(temp.path()).expect("should change cwd");
    let result = get_template(Some(&named("plots/mine.json")), None);
    env::set_current_dir(previous).expect("should restore cwd");

    assert_eq!(result.unwrap().content()["mark"], "bar");
}

#[test]
fn test_dump_all() {
    let temp = TempDir::new().expect("should create temp dir");
    let out = temp.path().join("nested").join("templates");
    let paths = dump_templates(&out, None).unwrap();

    let mut expected: Vec<String> = list_builtins().iter().map(|n| format!("{}.json", n)).collect();
    expected.sort();
    assert_eq!(listing(&out), expected);
    assert_eq!(paths.len(), expected.len());

    let text = fs::read_to_string(out.join("linear.json")).unwrap();
    assert!(text.ends_with('\n'));
    let reloaded = get_template(Some(&named("linear")), Some(&out)).unwrap();
    assert_eq!(reloaded.content(), get_template(None, None).unwrap().content());
}

#[test]
fn test_dump_targets() {
    let temp = TempDir::new().expect("should create temp dir");
    dump_templates(temp.path(), Some(&["smooth", "confusion"][..])).unwrap();
    assert_eq!(listing(temp.path()), vec!["confusion.json", "smooth.json"]);
}

#[test]
fn test_dump_is_idempotent() {
    let temp = TempDir::new().expect("should create temp dir");
    let first = dump_templates(temp.path(), None).unwrap();
    let second = dump_templates(temp.path(), None).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_dump_refuses_modified_template() {
    let temp = TempDir::new().expect("should create temp dir");
    dump_templates(temp.path(), Some(&["simple"][..])).unwrap();
    fs::write(temp.path().join("simple.json"), CUSTOM).expect("should overwrite template");

    let result = dump_templates(temp.path(), Some(&["simple"][..]));
    assert!(matches!(result, Err(RenderError::TemplateContentMismatch { ref name, .. }) if name == "simple"));
    assert_eq!(fs::read_to_string(temp.path().join("simple.json")).unwrap(), CUSTOM);
}

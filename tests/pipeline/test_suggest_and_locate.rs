use pipecheck::core::steps::build;
use pipecheck::core::{locate, suggest};

const PIPELINE: &str = "\
version: '1.0'
steps:
  push:
    type: push
    candidate: ${{build}}
    tag: latest
    provider: ecr
    region: us-east-1
    registry: dockerhub
  build:
    type: build
    image_name: app
";

#[test]
fn abbreviated_key_resolves_to_full_field() {
    let schema = build::schema();
    let names = schema.as_object().expect("object").known_names();
    assert_eq!(
        suggest(names.iter().map(String::as_str), "working_dir"),
        Some("working_directory".to_string())
    );
}

#[test]
fn noisy_key_gets_no_suggestion() {
    let names = ["title", "description", "stage"];
    assert_eq!(suggest(names, "titleaaa"), None);
}

#[test]
fn common_typos_against_build_fields() {
    let schema = build::schema();
    let names = schema.as_object().expect("object").known_names();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    assert_eq!(
        suggest(names.iter().copied(), "imgae_name"),
        Some("image_name".to_string())
    );
    assert_eq!(
        suggest(names.iter().copied(), "no_cahce"),
        Some("no_cache".to_string())
    );
    assert_eq!(
        suggest(names.iter().copied(), "build_arg"),
        Some("build_args".to_string())
    );
    assert_eq!(suggest(names.iter().copied(), "kubernetes_namespace"), None);
}

#[test]
fn locate_key_inside_step() {
    assert_eq!(locate(PIPELINE, Some("push"), Some("registry")), 9);
    assert_eq!(locate(PIPELINE, Some("build"), Some("image_name")), 12);
}

#[test]
fn locate_falls_back_to_step_line() {
    assert_eq!(locate(PIPELINE, Some("build"), Some("squash")), 10);
}

#[test]
fn locate_without_step_scans_everything() {
    assert_eq!(locate(PIPELINE, None, Some("provider")), 7);
    assert_eq!(locate(PIPELINE, None, Some("missing")), 0);
    assert_eq!(locate(PIPELINE, Some("deploy"), None), 0);
}

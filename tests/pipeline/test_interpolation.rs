use pipecheck::core::catalog::CatalogCache;
use pipecheck::core::error::InterpolationError;
use pipecheck::core::interpolation::{InterpolationEngine, InterpolatorRegistry, Variables};
use pipecheck::core::types::{FieldType, KeyCase};
use pipecheck::core::{AppError, ErrorCategory, StepRegistry};
use serde_json::{json, Value};

fn engine() -> InterpolationEngine {
    let cache = CatalogCache::new();
    InterpolationEngine::from_cache(
        &cache,
        &StepRegistry::builtin(),
        InterpolatorRegistry::builtin(),
    )
}

fn vars(pairs: &[(&str, &str)]) -> Variables {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn pipeline() -> Value {
    json!({
        "version": "1.0",
        "steps": {
            "clone": {"type": "git-clone", "repo": "org/app", "use_proxy": "FALSE", "exclude_blobs": "blob:none"},
            "build": {
                "type": "build",
                "image_name": "app",
                "no_cache": "${{NO_CACHE}}",
                "squash": "True",
                "buildx": "maybe",
                "cosign": {"sign": "true"},
                "title": "true"
            },
            "deploy": {"image": "kubectl", "commands": ["kubectl apply"], "fail_fast": "${{MISSING}}"}
        }
    })
}

#[test]
fn strict_fields_coerce_literals_in_any_case() {
    let out = engine()
        .handle_all_steps(&pipeline(), &vars(&[("NO_CACHE", "false")]))
        .expect("coerce");
    let build = &out["steps"]["build"];
    assert_eq!(build["squash"], json!(true));
    assert_eq!(build["no_cache"], json!(false));
    assert_eq!(build["cosign"]["sign"], json!(true));
    assert_eq!(out["steps"]["clone"]["use_proxy"], json!(false));
}

#[test]
fn string_fields_are_never_touched() {
    let out = engine()
        .handle_all_steps(&pipeline(), &Variables::new())
        .expect("coerce");
    assert_eq!(out["steps"]["build"]["title"], json!("true"));
    assert_eq!(out["version"], json!("1.0"));
}

#[test]
fn lenient_fields_keep_values_valid_under_another_shape() {
    let out = engine()
        .handle_all_steps(&pipeline(), &Variables::new())
        .expect("coerce");
    assert_eq!(out["steps"]["build"]["buildx"], json!("maybe"));
    assert_eq!(out["steps"]["clone"]["exclude_blobs"], json!("blob:none"));
}

#[test]
fn lenient_fields_still_coerce_boolean_literals() {
    let step = json!({"type": "git-clone", "repo": "a/b", "exclude_blobs": "TRUE"});
    let out = engine()
        .handle_single_step(&step, &Variables::new())
        .expect("coerce");
    assert_eq!(out["exclude_blobs"], json!(true));
}

#[test]
fn unbound_placeholders_are_left_in_place() {
    let out = engine()
        .handle_all_steps(&pipeline(), &Variables::new())
        .expect("coerce");
    assert_eq!(out["steps"]["build"]["no_cache"], json!("${{NO_CACHE}}"));
    assert_eq!(out["steps"]["deploy"]["fail_fast"], json!("${{MISSING}}"));
}

#[test]
fn embedded_placeholders_are_not_substituted() {
    let step = json!({"type": "build", "image_name": "app", "squash": "x${{SQUASH}}"});
    let err = engine()
        .handle_single_step(&step, &vars(&[("SQUASH", "true")]))
        .expect_err("not a full placeholder");
    assert_eq!(err.path(), Some("$.squash"));
}

#[test]
fn strict_failure_aborts_and_names_the_step_path() {
    let source = pipeline();
    let err = engine()
        .handle_all_steps(&source, &vars(&[("NO_CACHE", "sometimes")]))
        .expect_err("strict field");

    match &err {
        InterpolationError::Conversion {
            field_type,
            path,
            value,
            ..
        } => {
            assert_eq!(*field_type, FieldType::Boolean);
            assert_eq!(path, "$.steps.build.no_cache");
            assert_eq!(value, "sometimes");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let app: AppError = err.into();
    assert_eq!(app.category, ErrorCategory::ConversionError);
    assert_eq!(app.code, "PIPE-INT-001");
}

#[test]
fn input_document_is_never_modified() {
    let source = pipeline();
    let snapshot = source.clone();
    engine()
        .handle_all_steps(&source, &vars(&[("NO_CACHE", "true")]))
        .expect("coerce");
    assert_eq!(source, snapshot);
}

#[test]
fn second_pass_is_a_no_op() {
    let engine = engine();
    let bindings = vars(&[("NO_CACHE", "TRUE"), ("MISSING", "false")]);
    let once = engine
        .handle_all_steps(&pipeline(), &bindings)
        .expect("first pass");
    let twice = engine.handle_all_steps(&once, &bindings).expect("second pass");
    assert_eq!(once, twice);
}

#[test]
fn steps_without_type_use_the_default() {
    let engine = engine().with_default_step_type("build");
    let step = json!({"image_name": "app", "squash": "false"});
    let out = engine
        .handle_single_step(&step, &Variables::new())
        .expect("coerce");
    assert_eq!(out["squash"], json!(false));
}

#[test]
fn camel_engine_targets_camel_keys() {
    let engine = engine().with_key_case(KeyCase::Camel);
    assert_eq!(engine.key_case(), KeyCase::Camel);
    let step = json!({"type": "build", "imageName": "app", "noCfCache": "true", "no_cf_cache": "true"});
    let out = engine
        .handle_single_step(&step, &Variables::new())
        .expect("coerce");
    assert_eq!(out["noCfCache"], json!(true));
    assert_eq!(out["no_cf_cache"], json!("true"));
}

#[test]
fn missing_interpolator_is_a_lookup_error() {
    let cache = CatalogCache::new();
    let engine = InterpolationEngine::from_cache(
        &cache,
        &StepRegistry::builtin(),
        InterpolatorRegistry::empty(),
    );
    let mut step = json!({"type": "build", "squash": "true"});
    let err = engine
        .interpolate_step(&mut step, FieldType::Boolean, &Variables::new())
        .expect_err("no converter");
    assert_eq!(err, InterpolationError::Lookup(FieldType::Boolean));
    let app: AppError = err.into();
    assert_eq!(app.code, "PIPE-INT-002");
}

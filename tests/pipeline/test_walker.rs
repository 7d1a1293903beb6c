use pipecheck::core::schema::{walk, SchemaDescription as S};
use pipecheck::core::steps::{build, root_schema};
use pipecheck::core::types::{FieldType, KeyCase};
use pipecheck::core::StepRegistry;

#[test]
fn root_document_boolean_paths() {
    let paths = walk(&root_schema(), FieldType::Boolean, KeyCase::Plain);
    assert_eq!(paths.single_type_fields, vec!["$.strict_fail_fast"]);
    assert_eq!(paths.multiple_types_fields, vec!["$.fail_fast"]);
}

#[test]
fn build_step_boolean_paths() {
    let paths = walk(&build::schema(), FieldType::Boolean, KeyCase::Plain);
    assert_eq!(
        paths.single_type_fields,
        vec![
            "$.fail_fast",
            "$.strict_fail_fast",
            "$.no_cache",
            "$.no_cf_cache",
            "$.squash",
            "$.buildkit",
            "$.disable_push",
            "$.cosign.sign",
        ]
    );
    assert_eq!(paths.multiple_types_fields, vec!["$.buildx"]);
}

#[test]
fn camel_case_keeps_buckets() {
    let plain = walk(&build::schema(), FieldType::Boolean, KeyCase::Plain);
    let camel = walk(&build::schema(), FieldType::Boolean, KeyCase::Camel);

    assert!(camel.is_strict("$.strictFailFast"));
    assert!(camel.is_strict("$.noCfCache"));
    assert!(camel.is_strict("$.disablePush"));
    assert_eq!(camel.multiple_types_fields, vec!["$.buildx"]);
    assert_eq!(plain.len(), camel.len());
}

#[test]
fn arrays_produce_wildcard_segments() {
    let schema = S::object([(
        "matrix",
        S::array(S::object([("enabled", S::boolean()), ("name", S::string())])),
    )]);
    let paths = walk(&schema, FieldType::Boolean, KeyCase::Plain);
    assert_eq!(paths.single_type_fields, vec!["$.matrix[*].enabled"]);
}

#[test]
fn structured_alternative_is_walked_under_the_same_path() {
    let schema = S::object([(
        "cache",
        S::alternatives([
            S::boolean(),
            S::object([("shared", S::boolean()), ("key", S::string())]),
        ]),
    )]);
    let paths = walk(&schema, FieldType::Boolean, KeyCase::Plain);
    assert_eq!(paths.multiple_types_fields, vec!["$.cache"]);
    assert_eq!(paths.single_type_fields, vec!["$.cache.shared"]);
}

#[test]
fn no_path_lands_in_both_buckets() {
    let registry = StepRegistry::builtin();
    for (step_type, schema) in registry.schemas() {
        for case in [KeyCase::Plain, KeyCase::Camel] {
            let paths = walk(schema, FieldType::Boolean, case);
            for path in &paths.single_type_fields {
                assert!(
                    !paths.multiple_types_fields.contains(path),
                    "{} lists {} in both buckets",
                    step_type,
                    path
                );
            }
        }
    }
}

#[test]
fn walking_is_deterministic() {
    let first = walk(&build::schema(), FieldType::Boolean, KeyCase::Camel);
    let second = walk(&build::schema(), FieldType::Boolean, KeyCase::Camel);
    assert_eq!(first, second);
}

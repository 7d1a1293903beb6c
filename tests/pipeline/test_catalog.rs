use pipecheck::core::catalog::{CatalogCache, PathCatalog};
use pipecheck::core::types::{FieldType, KeyCase};
use pipecheck::core::StepRegistry;
use std::sync::Arc;
use std::thread;

#[test]
fn catalog_covers_every_builtin_step_in_both_key_forms() {
    let registry = StepRegistry::builtin();
    let catalog = PathCatalog::from_registry(&registry, &[FieldType::Boolean]);

    for step_type in registry.step_types() {
        let plain = catalog.get_paths_for_step(FieldType::Boolean, step_type, KeyCase::Plain);
        let camel = catalog.get_paths_for_step(FieldType::Boolean, step_type, KeyCase::Camel);
        let (plain, camel) = (plain.expect("plain paths"), camel.expect("camel paths"));
        assert_eq!(plain.len(), camel.len(), "{}", step_type);
        assert!(plain.is_strict("$.fail_fast"), "{}", step_type);
        assert!(camel.is_strict("$.failFast"), "{}", step_type);
    }
}

#[test]
fn git_clone_paths_in_both_key_forms() {
    let catalog = PathCatalog::from_registry(&StepRegistry::builtin(), &[FieldType::Boolean]);

    let plain = catalog
        .get_paths_for_step(FieldType::Boolean, "git-clone", KeyCase::Plain)
        .expect("git-clone paths");
    assert_eq!(
        plain.single_type_fields,
        vec!["$.fail_fast", "$.strict_fail_fast", "$.use_proxy"]
    );
    assert_eq!(plain.multiple_types_fields, vec!["$.exclude_blobs"]);

    let camel = catalog
        .get_paths_for_step(FieldType::Boolean, "git-clone", KeyCase::Camel)
        .expect("git-clone paths");
    assert_eq!(
        camel.single_type_fields,
        vec!["$.failFast", "$.strictFailFast", "$.useProxy"]
    );
    assert_eq!(camel.multiple_types_fields, vec!["$.excludeBlobs"]);
}

#[test]
fn catalog_view_serializes_to_documented_shape() {
    let catalog = PathCatalog::from_registry(&StepRegistry::builtin(), &[FieldType::Boolean]);
    let json = serde_json::to_value(catalog.view(KeyCase::Plain)).expect("serialize");

    let build = &json["boolean"]["steps"]["build"];
    assert_eq!(build["multipleTypesFields"], serde_json::json!(["$.buildx"]));
    assert!(build["singleTypeFields"]
        .as_array()
        .expect("array")
        .contains(&serde_json::json!("$.cosign.sign")));
}

#[test]
fn concurrent_first_callers_share_one_catalog() {
    let cache = CatalogCache::new();
    let registry = StepRegistry::builtin();

    let catalogs: Vec<Arc<PathCatalog>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| cache.get_or_build(&registry, &[FieldType::Boolean])))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("thread"))
            .collect()
    });

    for catalog in &catalogs[1..] {
        assert!(Arc::ptr_eq(&catalogs[0], catalog));
    }
}

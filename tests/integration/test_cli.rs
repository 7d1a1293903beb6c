use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const BIN: &str = "pipecheck";

const PIPELINE: &str = "\
version: '1.0'
steps:
  build:
    type: build
    image_name: app
    squash: '${{SQUASH}}'
    no_cache: 'TRUE'
";

fn pipecheck(workspace: &Path) -> Command {
    let mut cmd = Command::cargo_bin(BIN).expect("binary should build");
    cmd.current_dir(workspace)
        .env_remove("RUST_LOG")
        .env_remove("PIPECHECK_KEY_CASE")
        .env_remove("PIPECHECK_DEFAULT_STEP_TYPE")
        .env_remove("PIPECHECK_LOG_LEVEL")
        .env_remove("PIPECHECK_CONSOLE_OUTPUT");
    cmd
}

fn workspace_with(name: &str, content: &str) -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join(name), content).expect("write pipeline");
    dir
}

#[test]
fn version_flag_prints_crate_version() {
    let dir = TempDir::new().unwrap();
    pipecheck(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "{BIN} {}",
            pipecheck::VERSION
        )));
}

#[test]
fn lint_reports_unbound_placeholder_as_warning() {
    let dir = workspace_with("pipeline.yml", PIPELINE);
    pipecheck(dir.path())
        .args(["lint", "pipeline.yml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Warning [PIPE-LINT-006] line 6 build"))
        .stdout(predicate::str::contains("0 error(s), 1 warning(s)"));
}

#[test]
fn lint_with_bound_variable_is_clean() {
    let dir = workspace_with("pipeline.yml", PIPELINE);
    pipecheck(dir.path())
        .args(["lint", "pipeline.yml", "--var", "SQUASH=false"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 error(s), 0 warning(s)"));
}

#[test]
fn lint_fails_on_conversion_error() {
    let dir = workspace_with("pipeline.yml", PIPELINE);
    pipecheck(dir.path())
        .args(["lint", "pipeline.yml", "--var", "SQUASH=yes"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("PIPE-LINT-005"))
        .stderr(predicate::str::contains("failed lint with 1 error(s)"));
}

#[test]
fn lint_json_output_is_machine_readable() {
    let dir = workspace_with(
        "pipeline.yml",
        "version: '1.0'\nsteps:\n  build:\n    type: build\n    image_name: app\n    no_cahce: true\n",
    );
    let output = pipecheck(dir.path())
        .args(["lint", "pipeline.yml", "--format", "json"])
        .output()
        .expect("run pipecheck");

    assert_eq!(output.status.code(), Some(1));
    let results: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(results[0]["code"], "PIPE-LINT-002");
    assert_eq!(results[0]["severity"], "error");
    assert_eq!(results[0]["line"], 6);
    assert_eq!(results[0]["suggestion"], "did you mean 'no_cache'?");
}

#[test]
fn lint_missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    pipecheck(dir.path())
        .args(["lint", "absent.yml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("IO_ERROR"));
}

#[test]
fn interpolate_prints_coerced_yaml() {
    let dir = workspace_with("pipeline.yml", PIPELINE);
    pipecheck(dir.path())
        .args(["interpolate", "pipeline.yml", "--var", "SQUASH=False"])
        .assert()
        .success()
        .stdout(predicate::str::contains("squash: false"))
        .stdout(predicate::str::contains("no_cache: true"));
}

#[test]
fn interpolate_fails_with_offending_path() {
    let dir = workspace_with("pipeline.yml", PIPELINE);
    pipecheck(dir.path())
        .args(["interpolate", "pipeline.yml", "--var", "SQUASH=often"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("PIPE-INT-001"))
        .stderr(predicate::str::contains("$.steps.build.squash"));
}

#[test]
fn workspace_config_sets_default_step_type() {
    let dir = workspace_with(
        "pipeline.yml",
        "version: '1.0'\nsteps:\n  build:\n    image_name: app\n    squash: 'TRUE'\n",
    );
    fs::create_dir_all(dir.path().join(".pipecheck")).unwrap();
    fs::write(
        dir.path().join(".pipecheck").join("config.toml"),
        "[engine]\ndefault_step_type = \"build\"\n",
    )
    .unwrap();

    pipecheck(dir.path())
        .args(["interpolate", "pipeline.yml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("squash: true"));
}

#[test]
fn paths_for_one_step() {
    let dir = TempDir::new().unwrap();
    pipecheck(dir.path())
        .args(["paths", "--step", "build"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"$.cosign.sign\""))
        .stdout(predicate::str::contains("\"multipleTypesFields\": [\n    \"$.buildx\"\n  ]"));
}

#[test]
fn paths_in_camel_case() {
    let dir = TempDir::new().unwrap();
    let output = pipecheck(dir.path())
        .args(["paths", "--camel"])
        .output()
        .expect("run pipecheck");

    assert!(output.status.success());
    let catalog: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(catalog.as_object().map(|types| types.len()), Some(1));
    let steps = &catalog["boolean"]["steps"];
    let build = &steps["build"]["singleTypeFields"];
    assert!(build
        .as_array()
        .expect("array")
        .contains(&serde_json::json!("$.noCfCache")));
    assert_eq!(
        steps["git-clone"]["multipleTypesFields"],
        serde_json::json!(["$.excludeBlobs"])
    );
}

#[test]
fn paths_rejects_unknown_step_with_hint() {
    let dir = TempDir::new().unwrap();
    pipecheck(dir.path())
        .args(["paths", "--step", "biuld"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("did you mean 'build'?"));
}

#[test]
fn paths_rejects_type_without_interpolator() {
    let dir = TempDir::new().unwrap();
    pipecheck(dir.path())
        .args(["paths", "--type", "number"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("PIPE-INT-002"));
}

#[test]
fn malformed_binding_is_a_usage_error() {
    let dir = workspace_with("pipeline.yml", PIPELINE);
    pipecheck(dir.path())
        .args(["lint", "pipeline.yml", "--var", "SQUASH"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("expected KEY=VALUE"));
}

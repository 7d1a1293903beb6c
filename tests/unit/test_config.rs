use insta::assert_debug_snapshot;
use pipecheck::core::config::{ConfigLoader, PipecheckConfig};
use pipecheck::core::types::KeyCase;
use pipecheck::logging::ConsoleOutput;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

fn clear_pipecheck_env() {
    for v in &[
        "PIPECHECK_KEY_CASE",
        "PIPECHECK_DEFAULT_STEP_TYPE",
        "PIPECHECK_LOG_LEVEL",
        "PIPECHECK_CONSOLE_OUTPUT",
    ] {
        env::remove_var(v);
    }
}

fn write_config(workspace: &TempDir, content: &str) {
    let dir = workspace.path().join(".pipecheck");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.toml"), content).unwrap();
}

#[test]
#[serial]
fn test_config_file_values() {
    clear_pipecheck_env();
    let temp_dir = TempDir::new().unwrap();
    write_config(
        &temp_dir,
        r#"
[engine]
key_case = "camel"
default_step_type = "build"

[logging]
default_level = "pipecheck=debug"
console_output = "stdout"
"#,
    );

    let config = ConfigLoader::load_from_workspace(temp_dir.path()).unwrap();
    assert_debug_snapshot!(config, @r###"
    PipecheckConfig {
        engine: EngineConfig {
            key_case: Camel,
            default_step_type: "build",
        },
        logging: LoggingSettings {
            default_level: "pipecheck=debug",
            console_output: Some(
                Stdout,
            ),
        },
    }
    "###);
}

#[test]
#[serial]
fn test_partial_config_uses_defaults() {
    clear_pipecheck_env();
    let temp_dir = TempDir::new().unwrap();
    write_config(&temp_dir, "[engine]\nkey_case = \"plain\"\n");

    let config = ConfigLoader::load_from_workspace(temp_dir.path()).unwrap();
    assert_eq!(config, PipecheckConfig::default());
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_pipecheck_env();
    let temp_dir = TempDir::new().unwrap();
    write_config(
        &temp_dir,
        "[engine]\ndefault_step_type = \"build\"\n[logging]\nconsole_output = \"stdout\"\n",
    );

    env::set_var("PIPECHECK_KEY_CASE", "CAMEL");
    env::set_var("PIPECHECK_DEFAULT_STEP_TYPE", "push");
    env::set_var("PIPECHECK_LOG_LEVEL", "trace");
    env::set_var("PIPECHECK_CONSOLE_OUTPUT", "none");
    let config = ConfigLoader::load_from_workspace(temp_dir.path());
    clear_pipecheck_env();

    let config = config.unwrap();
    assert_eq!(config.engine.key_case, KeyCase::Camel);
    assert_eq!(config.engine.default_step_type, "push");
    assert_eq!(config.logging.default_level, "trace");
    assert_eq!(config.logging.console_output, Some(ConsoleOutput::None));
}

#[test]
#[serial]
fn test_malformed_toml_is_rejected() {
    clear_pipecheck_env();
    let temp_dir = TempDir::new().unwrap();
    write_config(&temp_dir, "[engine\nkey_case = camel");

    let err = ConfigLoader::load_from_workspace(temp_dir.path()).unwrap_err();
    assert_eq!(err.code, "PIPE-VAL-000");
    assert!(err.message.contains("Failed to parse config file"));
}

#[test]
#[serial]
fn test_unknown_key_case_in_file_is_rejected() {
    clear_pipecheck_env();
    let temp_dir = TempDir::new().unwrap();
    write_config(&temp_dir, "[engine]\nkey_case = \"kebab\"\n");

    assert!(ConfigLoader::load_from_workspace(temp_dir.path()).is_err());
}

#[test]
#[serial]
fn test_invalid_console_output_env() {
    clear_pipecheck_env();
    env::set_var("PIPECHECK_CONSOLE_OUTPUT", "syslog");
    let temp_dir = TempDir::new().unwrap();
    let result = ConfigLoader::load_from_workspace(temp_dir.path());
    clear_pipecheck_env();

    assert!(result.unwrap_err().message.contains("syslog"));
}

#[test]
fn test_env_var_documentation_lists_every_override() {
    let docs = ConfigLoader::env_var_documentation();
    assert_eq!(docs.len(), 4);
    assert!(docs.iter().all(|line| line.starts_with("PIPECHECK_")));
}

#![allow(clippy::result_large_err)]

use super::{ConfigValidator, PipecheckConfig};
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use std::env;
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config from the workspace (`<workspace>/.pipecheck/config.toml`).
    /// Environment variables override config file values.
    /// A missing file yields defaults plus environment overrides.
    pub fn load_from_workspace(workspace_path: &Path) -> Result<PipecheckConfig, AppError> {
        let config_path = workspace_path.join(".pipecheck").join("config.toml");
        let config_file = Self::load_from_file(&config_path)?;

        let mut config = config_file.unwrap_or_default();

        Self::apply_env_overrides(&mut config)?;
        ConfigValidator::validate(&config)?;

        Ok(config)
    }

    /// Load config from specific file path
    /// Returns Ok(None) if file doesn't exist
    pub fn load_from_file(path: &Path) -> Result<Option<PipecheckConfig>, AppError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::new(
                ErrorCategory::IoError,
                format!("Failed to read config file {}: {}", path.display(), e),
            )
        })?;

        let config: PipecheckConfig = toml::from_str(&content).map_err(|e| {
            AppError::new(
                ErrorCategory::ValidationError,
                format!("Failed to parse config file {}: {}", path.display(), e),
            )
        })?;

        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(Some(config))
    }

    /// Apply environment variable overrides to the configuration
    /// Environment variables take precedence over config file values
    fn apply_env_overrides(config: &mut PipecheckConfig) -> Result<(), AppError> {
        if let Ok(key_case) = env::var("PIPECHECK_KEY_CASE") {
            config.engine.key_case = key_case
                .parse()
                .map_err(|e: String| AppError::new(ErrorCategory::ValidationError, e))?;
        }

        if let Ok(step_type) = env::var("PIPECHECK_DEFAULT_STEP_TYPE") {
            config.engine.default_step_type = step_type;
        }

        if let Ok(level) = env::var("PIPECHECK_LOG_LEVEL") {
            config.logging.default_level = level;
        }

        if let Ok(output) = env::var("PIPECHECK_CONSOLE_OUTPUT") {
            config.logging.console_output = Some(
                output
                    .parse()
                    .map_err(|e: String| AppError::new(ErrorCategory::ValidationError, e))?,
            );
        }

        Ok(())
    }

    /// Get documentation for supported environment variables
    pub fn env_var_documentation() -> &'static [&'static str] {
        &[
            "PIPECHECK_KEY_CASE - Key spelling of catalog paths (plain/camel, default: plain)",
            "PIPECHECK_DEFAULT_STEP_TYPE - Step type for steps without `type` (default: freestyle)",
            "PIPECHECK_LOG_LEVEL - Default tracing directive when RUST_LOG is unset (default: warn)",
            "PIPECHECK_CONSOLE_OUTPUT - Console log sink (stdout/stderr/none, default: stderr)",
        ]
    }
}

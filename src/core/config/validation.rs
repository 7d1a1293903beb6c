#![allow(clippy::result_large_err)]

use super::PipecheckConfig;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use std::str::FromStr;
use tracing_subscriber::filter::LevelFilter;

pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration rules
    pub fn validate(config: &PipecheckConfig) -> Result<(), AppError> {
        if config.engine.default_step_type.trim().is_empty() {
            return Err(AppError::new(
                ErrorCategory::ValidationError,
                "engine.default_step_type cannot be empty",
            ));
        }

        if !is_level_spec(&config.logging.default_level) {
            return Err(AppError::new(
                ErrorCategory::ValidationError,
                format!(
                    "logging.default_level '{}' must be a level or a list of target=level",
                    config.logging.default_level
                ),
            ));
        }

        Ok(())
    }
}

/// `warn`, or comma-separated `level` / `target=level` pieces such as `warn,pipecheck=debug`.
fn is_level_spec(spec: &str) -> bool {
    let is_level = |text: &str| LevelFilter::from_str(text.trim()).is_ok();
    !spec.trim().is_empty()
        && spec.split(',').all(|piece| match piece.split_once('=') {
            Some((target, level)) => {
                let target = target.trim();
                !target.is_empty()
                    && target
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '-'))
                    && is_level(level)
            }
            None => is_level(piece),
        })
}

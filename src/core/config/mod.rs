pub mod loader;
pub mod validation;

pub use loader::ConfigLoader;
pub use validation::ConfigValidator;

use crate::core::steps::DEFAULT_STEP_TYPE;
use crate::core::types::KeyCase;
use crate::logging::ConsoleOutput;
use serde::{Deserialize, Serialize};

/// Main pipecheck configuration loaded from `.pipecheck/config.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PipecheckConfig {
    /// Interpolation engine configuration
    #[serde(default)]
    pub engine: EngineConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Interpolation engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Key spelling of the catalog paths applied to documents
    #[serde(default)]
    pub key_case: KeyCase,

    /// Step type assumed when a step omits `type`
    #[serde(default = "default_step_type")]
    pub default_step_type: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// Default tracing directive when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub default_level: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub console_output: Option<ConsoleOutput>,
}

fn default_step_type() -> String {
    DEFAULT_STEP_TYPE.to_string()
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            key_case: KeyCase::default(),
            default_step_type: default_step_type(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            default_level: default_level(),
            console_output: None,
        }
    }
}

pub mod context;
pub mod layers;

pub use context::{detect_context, ExecutionContext};
pub use layers::console::ConsoleOutput;

use crate::core::config::LoggingSettings;
use crate::{cli::Command, Result};
use anyhow::{anyhow, Context};
use layers::console;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::Registry;

static LOGGER_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Summary of the sinks installed by [`init`].
#[derive(Debug)]
pub struct LoggingGuard {
    console_output: ConsoleOutput,
}

impl LoggingGuard {
    /// Returns the console output configuration used during initialization.
    pub fn console_output(&self) -> ConsoleOutput {
        self.console_output
    }
}

/// Initialize the logging framework for the provided CLI command.
///
/// `RUST_LOG` takes precedence over `settings.default_level`. Errors when invoked more than
/// once per process unless tests explicitly reset the guard.
pub fn init(command: &Command, settings: &LoggingSettings) -> Result<LoggingGuard> {
    if LOGGER_INITIALIZED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return Err(anyhow!("logging already initialized"));
    }

    let context = detect_context(command);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.default_level))
        .context("failed to configure tracing level")?;

    let console_output = console::select_console_output(context, settings.console_output);
    let console_layer = console::console_layer::<Registry>(console_output);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(env_filter)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(LoggingGuard { console_output })
}

#[cfg(test)]
/// Reset the initialization guard so tests can reconfigure logging multiple times.
pub fn reset_for_tests() {
    LOGGER_INITIALIZED.store(false, Ordering::SeqCst);
}

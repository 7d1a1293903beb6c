use crate::logging::context::ExecutionContext;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::str::FromStr;
use tracing::Subscriber;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Where console logs go. Lint reports and coerced documents own stdout, so logs default to
/// stderr.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleOutput {
    Stdout,
    #[default]
    Stderr,
    None,
}

impl ConsoleOutput {
    const ALL: [ConsoleOutput; 3] = [ConsoleOutput::Stdout, ConsoleOutput::Stderr, ConsoleOutput::None];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsoleOutput::Stdout => "stdout",
            ConsoleOutput::Stderr => "stderr",
            ConsoleOutput::None => "none",
        }
    }

    fn writer(self) -> BoxMakeWriter {
        match self {
            ConsoleOutput::Stdout => BoxMakeWriter::new(io::stdout),
            ConsoleOutput::Stderr => BoxMakeWriter::new(io::stderr),
            ConsoleOutput::None => BoxMakeWriter::new(io::sink),
        }
    }
}

impl fmt::Display for ConsoleOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsoleOutput {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|output| output.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| {
                format!(
                    "invalid console_output '{}'; supported values are stdout, stderr, none",
                    value
                )
            })
    }
}

/// Sink for `configured`, except that commands printing a document on stdout never share it
/// with log lines.
pub fn select_console_output(
    context: ExecutionContext,
    configured: Option<ConsoleOutput>,
) -> ConsoleOutput {
    match configured.unwrap_or_default() {
        ConsoleOutput::Stdout if context.reserves_stdout() => ConsoleOutput::Stderr,
        output => output,
    }
}

/// Compact, uncoloured event lines on the sink chosen by `output`.
pub fn console_layer<S>(output: ConsoleOutput) -> impl Layer<S> + Send + Sync
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    layer_on(output.writer())
}

fn layer_on<S>(writer: BoxMakeWriter) -> impl Layer<S> + Send + Sync
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .compact()
        .without_time()
        .with_ansi(false)
        .with_target(false)
        .with_writer(writer)
}

use crate::cli::Command;

/// Execution contexts that influence how logging is routed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionContext {
    /// Human-readable report on stdout, logs may share the terminal.
    Interactive,
    /// Machine-readable document on stdout that log lines must never corrupt.
    Structured,
}

impl ExecutionContext {
    /// Returns `true` when stdout is reserved for command output.
    pub fn reserves_stdout(self) -> bool {
        matches!(self, ExecutionContext::Structured)
    }
}

/// Derive the active execution context from a parsed CLI command.
pub fn detect_context(command: &Command) -> ExecutionContext {
    match command {
        Command::Lint(args) if !args.format.is_structured() => ExecutionContext::Interactive,
        Command::Lint(_) | Command::Interpolate(_) | Command::Paths(_) => {
            ExecutionContext::Structured
        }
    }
}

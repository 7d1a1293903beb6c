use crate::core::types::FieldType;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct LintArgs {
    /// Pipeline document to check (YAML or JSON)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Bind a `${{KEY}}` placeholder (repeatable)
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_variable)]
    pub vars: Vec<(String, String)>,

    /// Emit either terminal-friendly text or machine-readable JSON
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: LintFormat,
}

#[derive(Args, Debug)]
pub struct InterpolateArgs {
    /// Pipeline document to coerce (YAML or JSON)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Bind a `${{KEY}}` placeholder (repeatable)
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_variable)]
    pub vars: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct PathsArgs {
    /// Target field type of the listed paths
    #[arg(long = "type", default_value = "boolean", value_name = "TYPE")]
    pub field_type: FieldType,

    /// List camel-cased key paths instead of plain ones
    #[arg(long)]
    pub camel: bool,

    /// Restrict output to one step type
    #[arg(long, value_name = "TYPE")]
    pub step: Option<String>,
}

#[derive(Clone, Copy, clap::ValueEnum, Debug, PartialEq, Eq)]
pub enum LintFormat {
    /// One finding per line followed by a summary
    Text,
    /// JSON array suitable for downstream tooling
    Json,
}

impl LintFormat {
    /// Whether stdout carries a machine-readable document.
    pub fn is_structured(self) -> bool {
        matches!(self, LintFormat::Json)
    }
}

/// Parse a `KEY=VALUE` binding. The value may itself contain `=`.
pub fn parse_variable(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("invalid binding '{}'; expected KEY=VALUE", raw)),
    }
}

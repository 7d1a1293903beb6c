pub mod args;
pub mod commands;

pub use args::{InterpolateArgs, LintArgs, LintFormat, PathsArgs};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\nOPTIONS:\n{options}\n\
PIPELINE COMMANDS:\n{subcommands}\n";

#[derive(Parser, Debug)]
#[command(name = "pipecheck")]
#[command(version = crate::VERSION)]
#[command(about = "Type-aware checks and value coercion for CI pipeline documents")]
#[command(help_template = HELP_TEMPLATE)]
#[command(
    after_long_help = "Typical flow: lint a pipeline, bind variables with --var, then inspect the coerced document."
)]
pub struct Args {
    /// Workspace holding .pipecheck/config.toml (default: current directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub workspace: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(
        about = "Check a pipeline document",
        long_about = "Lint validates step types and fields against their schemas, coerces typed fields, and reports every finding with its source line.",
        after_help = "Example:\n    pipecheck lint codefresh.yml --var NO_CACHE=true --format json"
    )]
    Lint(LintArgs),
    #[command(
        about = "Print the coerced pipeline",
        long_about = "Interpolate resolves ${{VAR}} placeholders and converts strings such as \"TRUE\" in boolean fields, then prints the document as YAML.",
        after_help = "Example:\n    pipecheck interpolate codefresh.yml --var PUSH=false"
    )]
    Interpolate(InterpolateArgs),
    #[command(
        about = "Show tracked field paths",
        long_about = "Paths prints the precomputed catalog of field paths per step type as JSON.",
        after_help = "Example:\n    pipecheck paths --step build --camel"
    )]
    Paths(PathsArgs),
}

pub fn run(args: Args, config: &crate::core::PipecheckConfig) -> crate::Result<()> {
    match args.command {
        Command::Lint(lint_args) => commands::lint(lint_args, config),
        Command::Interpolate(interpolate_args) => commands::interpolate(interpolate_args, config),
        Command::Paths(paths_args) => commands::paths(paths_args),
    }
}

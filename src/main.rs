use clap::Parser;
use pipecheck::cli::{self, Args};
use pipecheck::core::{AppError, ConfigLoader, DefaultErrorReporter, ErrorReporter};
use pipecheck::logging;
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<AppError>() {
                Some(app_error) => DefaultErrorReporter::new().report_error(app_error),
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> pipecheck::Result<()> {
    let workspace = match &args.workspace {
        Some(path) => path.clone(),
        None => env::current_dir()?,
    };
    let config = ConfigLoader::load_from_workspace(&workspace)?;
    let guard = logging::init(&args.command, &config.logging)?;
    tracing::debug!(
        workspace = %workspace.display(),
        console = %guard.console_output(),
        "configuration loaded"
    );
    cli::run(args, &config)
}

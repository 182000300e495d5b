//! salarysheet entry point.

use std::process::ExitCode;

use clap::Parser;

use salarysheet_core::{TracingConfig, TracingOutputFormat, init_tracing};
use salarysheet_server::cli::{Cli, Command, ConfigAction};
use salarysheet_server::commands;
use salarysheet_server::config::AppConfig;
use salarysheet_server::error::{ServerError, ServerResult};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_tracing(&cli) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn setup_tracing(cli: &Cli) -> ServerResult<()> {
    let format: TracingOutputFormat = cli.log_format.parse()?;
    let config = if cli.debug {
        TracingConfig::debug()
    } else {
        TracingConfig::server()
    };
    init_tracing(config.with_format(format))?;
    Ok(())
}

async fn run(cli: Cli) -> ServerResult<()> {
    let mut config = match cli.config {
        Some(ref path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .map_err(ServerError::config)?;
    config.apply(cli.overrides());

    match cli.command {
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => commands::config::dump(&config),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(),
        },
        Some(Command::Run) => {
            let resolved = config.resolve().map_err(ServerError::config)?;
            commands::run::run_once(resolved).await
        }
        Some(Command::Serve) | None => {
            let resolved = config.resolve().map_err(ServerError::config)?;
            commands::serve::serve(resolved).await
        }
    }
}

mod cli;
mod commands;
mod error;
mod metadata;
mod output;
mod shell;

use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::commands::Session;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is normal; the environment may already be set.
    dotenvy::dotenv().ok();
    init_tracing();

    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    let session = Session::from_cli(&cli)?;

    let page = match &cli.command {
        Command::Page(page) => page,
        Command::Shell => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let stdout = io::stdout();
            shell::run(&session, stdin, &mut stdout.lock(), cli.format, cli.pretty).await?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    let envelope = commands::run(&session, page).await?;
    output::render(&envelope, cli.format, cli.pretty)?;

    if cli.strict && (!envelope.meta.warnings.is_empty() || !envelope.errors.is_empty()) {
        return Err(CliError::StrictModeViolation {
            warning_count: envelope.meta.warnings.len(),
            error_count: envelope.errors.len(),
        });
    }

    if !envelope.errors.is_empty() {
        return Ok(ExitCode::from(3));
    }

    Ok(ExitCode::SUCCESS)
}

//! idm - identity directory administration
//!
//! Runs one directory operation against the configured SQLite database and
//! prints the result as JSON.
//!
//! # Examples
//!
//! ```bash
//! # First admin account
//! idm bootstrap-admin --username root --email root@example.com --password s3cret!
//!
//! # Log in and keep the token
//! export IDM_TOKEN=$(idm login root --password s3cret! | jq -r .access_token)
//!
//! # Admin operations
//! idm list-users --role user --pretty
//! idm update-user <id> --role admin
//! ```

use idm_cli::runner::error_body;
use idm_cli::{Cli, CliError, CliResult, build_service, logger, run};
use idm_config::{Config, LogLevel};

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (development)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Idm(e)) => {
            error!("{}", e);
            eprintln!("{}", error_body(&e));
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> CliResult<()> {
    let config = Config::load()?;
    config.validate()?;

    let log_level = cli
        .log_level
        .as_deref()
        .map_or(config.logging.level, LogLevel::parse_lenient);
    logger::initialize(log_level, log_file_path(&config)?, config.logging.colored)?;
    config.log_summary();

    let database_path = config.database_path()?;
    let service = build_service(&config, &database_path).await?;

    let value = run(&service, cli.command, cli.token.as_deref()).await?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    println!("{}", output);

    Ok(())
}

/// Construct log file path if configured, creating its directory.
fn log_file_path(config: &Config) -> CliResult<Option<PathBuf>> {
    let Some(ref filename) = config.logging.file else {
        return Ok(None);
    };

    let log_dir = Config::config_dir()?.join(&config.logging.dir);
    std::fs::create_dir_all(&log_dir).map_err(|e| CliError::Logger {
        message: format!("Failed to create log directory {}: {}", log_dir.display(), e),
    })?;

    Ok(Some(log_dir.join(filename)))
}

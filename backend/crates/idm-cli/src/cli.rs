use crate::commands::Commands;

use clap::Parser;

#[derive(Parser)]
#[command(name = "idm")]
#[command(about = "Identity directory administration")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Bearer token for guarded commands
    #[arg(long, global = true, env = "IDM_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Override the configured log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}

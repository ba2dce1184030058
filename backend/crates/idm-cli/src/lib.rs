//! idm-cli library
//!
//! Argument definitions, service wiring and command execution for the `idm`
//! binary. Exposed as a library so the wiring can be tested without a process.

pub mod app;
pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod runner;

#[cfg(test)]
mod tests;

pub use app::build_service;
pub use cli::Cli;
pub use commands::Commands;
pub use error::{CliError, Result as CliResult};
pub use runner::run;

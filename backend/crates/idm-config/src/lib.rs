mod auth_config;
mod config;
mod database_config;
mod error;
mod log_level;
mod logging_config;
mod password_config;
mod retry_policy;

pub use auth_config::AuthConfig;
pub use config::Config;
pub use database_config::DatabaseConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use password_config::PasswordConfig;
pub use retry_policy::RetryPolicy;

const CONFIG_DIR_ENV: &str = "IDM_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = ".idm";
const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_DATABASE_FILENAME: &str = "users.db";
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";

#[cfg(test)]
mod tests;

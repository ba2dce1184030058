use crate::{ConfigError, ConfigErrorResult, DEFAULT_DATABASE_FILENAME};

use serde::Deserialize;

pub const MIN_MAX_CONNECTIONS: u32 = 1;
pub const MAX_MAX_CONNECTIONS: u32 = 64;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

pub const MIN_OPERATION_TIMEOUT_MS: u64 = 10;
pub const MAX_OPERATION_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_OPERATION_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file, relative to the config directory
    pub path: String,
    pub max_connections: u32,
    /// Deadline applied to every storage call
    pub operation_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: String::from(DEFAULT_DATABASE_FILENAME),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            operation_timeout_ms: DEFAULT_OPERATION_TIMEOUT_MS,
        }
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        let path = std::path::Path::new(&self.path);
        if self.path.is_empty() || path.is_absolute() || self.path.contains("..") {
            return Err(ConfigError::database(
                "database.path must be relative and cannot contain '..'",
            ));
        }

        if self.max_connections < MIN_MAX_CONNECTIONS || self.max_connections > MAX_MAX_CONNECTIONS
        {
            return Err(ConfigError::database(format!(
                "database.max_connections must be {}-{}, got {}",
                MIN_MAX_CONNECTIONS, MAX_MAX_CONNECTIONS, self.max_connections
            )));
        }

        if self.operation_timeout_ms < MIN_OPERATION_TIMEOUT_MS
            || self.operation_timeout_ms > MAX_OPERATION_TIMEOUT_MS
        {
            return Err(ConfigError::database(format!(
                "database.operation_timeout_ms must be {}-{}, got {}",
                MIN_OPERATION_TIMEOUT_MS, MAX_OPERATION_TIMEOUT_MS, self.operation_timeout_ms
            )));
        }

        Ok(())
    }
}

use crate::{
    AuthConfig, CONFIG_DIR_ENV, CONFIG_FILENAME, ConfigError, ConfigErrorResult,
    DEFAULT_CONFIG_DIR, DatabaseConfig, LoggingConfig, PasswordConfig, RetryPolicy,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub password: PasswordConfig,
    pub retry: RetryPolicy,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. IDM_CONFIG_DIR env var, else ./.idm/
    /// 2. config.toml in that directory if it exists, else defaults
    /// 3. IDM_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_path = Self::config_dir()?.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: IDM_CONFIG_DIR env var > ./.idm/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.database.validate()?;
        self.auth.validate()?;
        self.password.validate()?;
        self.retry.validate()?;
        Ok(())
    }

    /// Get absolute path to database file.
    pub fn database_path(&self) -> ConfigErrorResult<PathBuf> {
        Ok(Self::config_dir()?.join(&self.database.path))
    }

    /// Log configuration summary (NEVER logs secrets).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  database: {} (max {} connections, timeout {}ms)",
            self.database.path, self.database.max_connections, self.database.operation_timeout_ms
        );
        info!(
            "  auth: HS256, secret {}, tokens valid {}m",
            if self.auth.jwt_secret.is_some() {
                "set"
            } else {
                "missing"
            },
            self.auth.access_token_expire_minutes
        );
        info!(
            "  password: argon2id m={}KiB t={} p={}",
            self.password.memory_kib, self.password.iterations, self.password.parallelism
        );
        info!(
            "  retry: attempts={}, initial={}ms, max={}ms, backoff={}x",
            self.retry.max_attempts,
            self.retry.initial_delay_ms,
            self.retry.max_delay_ms,
            self.retry.backoff_multiplier
        );
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // Database
        Self::apply_env_string("IDM_DATABASE_PATH", &mut self.database.path);
        Self::apply_env_parse(
            "IDM_DATABASE_MAX_CONNECTIONS",
            &mut self.database.max_connections,
        );
        Self::apply_env_parse(
            "IDM_DATABASE_OPERATION_TIMEOUT_MS",
            &mut self.database.operation_timeout_ms,
        );

        // Auth
        Self::apply_env_option_string("IDM_AUTH_JWT_SECRET", &mut self.auth.jwt_secret);
        Self::apply_env_parse(
            "IDM_AUTH_ACCESS_TOKEN_EXPIRE_MINUTES",
            &mut self.auth.access_token_expire_minutes,
        );

        // Password
        Self::apply_env_parse("IDM_PASSWORD_MEMORY_KIB", &mut self.password.memory_kib);
        Self::apply_env_parse("IDM_PASSWORD_ITERATIONS", &mut self.password.iterations);
        Self::apply_env_parse("IDM_PASSWORD_PARALLELISM", &mut self.password.parallelism);

        // Retry
        Self::apply_env_parse("IDM_RETRY_MAX_ATTEMPTS", &mut self.retry.max_attempts);
        Self::apply_env_parse(
            "IDM_RETRY_INITIAL_DELAY_MS",
            &mut self.retry.initial_delay_ms,
        );
        Self::apply_env_parse("IDM_RETRY_MAX_DELAY_MS", &mut self.retry.max_delay_ms);
        Self::apply_env_parse(
            "IDM_RETRY_BACKOFF_MULTIPLIER",
            &mut self.retry.backoff_multiplier,
        );
        Self::apply_env_bool("IDM_RETRY_JITTER", &mut self.retry.jitter);

        // Logging
        Self::apply_env_parse("IDM_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("IDM_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("IDM_LOG_FILE", &mut self.logging.file);
        Self::apply_env_string("IDM_LOG_DIR", &mut self.logging.dir);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}

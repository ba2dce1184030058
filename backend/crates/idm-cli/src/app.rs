//! Builds an `IdentityService` from validated configuration.

use crate::CliResult;

use idm_auth::{CredentialVerifier, PasswordPolicy, TokenConfig, TokenService};
use idm_config::{Config, ConfigError, PasswordConfig};
use idm_db::{SqliteUserStore, open_pool, run_migrations};
use idm_service::{IdentityService, UserDirectory};

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use log::info;

/// Open the database at `database_path`, apply migrations and wire the service.
pub async fn build_service(config: &Config, database_path: &Path) -> CliResult<IdentityService> {
    let tokens = TokenService::new(&token_config(config)?);
    let verifier = CredentialVerifier::new(&password_policy(&config.password))?;

    let pool = open_pool(database_path, config.database.max_connections).await?;
    run_migrations(&pool).await?;
    info!("User database ready at {}", database_path.display());

    let directory = UserDirectory::new(Arc::new(SqliteUserStore::new(pool)), verifier)
        .with_deadline(Duration::from_millis(config.database.operation_timeout_ms))
        .with_retry(config.retry.clone());

    Ok(IdentityService::new(directory, tokens))
}

pub fn token_config(config: &Config) -> CliResult<TokenConfig> {
    let secret = config
        .auth
        .jwt_secret
        .as_deref()
        .ok_or_else(|| ConfigError::auth("auth.jwt_secret is required"))?;

    let minutes = config.auth.access_token_expire_minutes;
    let default_ttl = chrono::Duration::try_minutes(minutes).ok_or_else(|| {
        ConfigError::auth(format!(
            "auth.access_token_expire_minutes {minutes} is out of range"
        ))
    })?;

    Ok(TokenConfig::new(secret.as_bytes().to_vec()).with_default_ttl(default_ttl))
}

pub fn password_policy(config: &PasswordConfig) -> PasswordPolicy {
    PasswordPolicy {
        memory_kib: config.memory_kib,
        iterations: config.iterations,
        parallelism: config.parallelism,
    }
}

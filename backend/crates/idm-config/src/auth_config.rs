use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const MIN_JWT_SECRET_LENGTH: usize = 32;

pub const MIN_EXPIRE_MINUTES: i64 = 1;
pub const MAX_EXPIRE_MINUTES: i64 = 1440;
pub const DEFAULT_EXPIRE_MINUTES: i64 = 30;

/// Token signing settings. The secret is required; there is no unsigned mode.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 shared secret
    pub jwt_secret: Option<String>,
    pub access_token_expire_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            access_token_expire_minutes: DEFAULT_EXPIRE_MINUTES,
        }
    }
}

impl AuthConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        match &self.jwt_secret {
            None => {
                return Err(ConfigError::auth(
                    "auth.jwt_secret is required (set IDM_AUTH_JWT_SECRET)",
                ));
            }
            Some(secret) if secret.len() < MIN_JWT_SECRET_LENGTH => {
                return Err(ConfigError::auth(format!(
                    "auth.jwt_secret must be at least {} characters",
                    MIN_JWT_SECRET_LENGTH
                )));
            }
            Some(_) => {}
        }

        if self.access_token_expire_minutes < MIN_EXPIRE_MINUTES
            || self.access_token_expire_minutes > MAX_EXPIRE_MINUTES
        {
            return Err(ConfigError::auth(format!(
                "auth.access_token_expire_minutes must be {}-{}, got {}",
                MIN_EXPIRE_MINUTES, MAX_EXPIRE_MINUTES, self.access_token_expire_minutes
            )));
        }

        Ok(())
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field(
                "access_token_expire_minutes",
                &self.access_token_expire_minutes,
            )
            .finish()
    }
}

use crate::DEFAULT_ACCESS_TOKEN_MINUTES;

use chrono::Duration;

/// Immutable signing configuration handed to the token service at construction.
#[derive(Clone)]
pub struct TokenConfig {
    /// HS256 shared secret
    pub secret: Vec<u8>,
    /// Lifetime applied when the caller does not ask for one
    pub default_ttl: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            default_ttl: Duration::minutes(DEFAULT_ACCESS_TOKEN_MINUTES),
        }
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

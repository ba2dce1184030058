
use idm_auth::{CredentialVerifier, PasswordPolicy, TokenConfig, TokenService};
use idm_config::Config;
use idm_db::{MemoryUserStore, RetryPolicy};
use idm_service::{IdentityService, UserDirectory};

use std::sync::Arc;

pub(crate) const VALID_SECRET: &str = "12345678901234567890123456789012";

pub(crate) fn fast_policy() -> PasswordPolicy {
    PasswordPolicy {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    }
}

/// Service over an in-memory store
pub(crate) fn memory_service() -> IdentityService {
    let verifier = CredentialVerifier::new(&fast_policy()).unwrap();
    let directory = UserDirectory::new(Arc::new(MemoryUserStore::new()), verifier)
        .with_retry(RetryPolicy::none());
    IdentityService::new(
        directory,
        TokenService::new(&TokenConfig::new(VALID_SECRET.as_bytes().to_vec())),
    )
}

/// Valid config with the cheapest password parameters
pub(crate) fn test_config() -> Config {
    let mut config = Config::default();
    config.auth.jwt_secret = Some(VALID_SECRET.to_string());
    config.password.memory_kib = 1024;
    config.password.iterations = 1;
    config
}

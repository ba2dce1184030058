#![allow(dead_code)]

pub mod stores;

use idm_auth::{CredentialVerifier, PasswordPolicy, TokenConfig, TokenService};
use idm_core::{NewUser, Role};
use idm_db::{MemoryUserStore, RetryPolicy, SqliteUserStore, UserStore};
use idm_service::{IdentityService, UserDirectory};

use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub const TEST_SECRET: &[u8] = b"service-test-secret-at-least-32-bytes";
pub const PASSWORD: &str = "secret1";

/// Cheapest parameters argon2 accepts.
pub fn fast_policy() -> PasswordPolicy {
    PasswordPolicy {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    }
}

pub fn fast_verifier() -> CredentialVerifier {
    CredentialVerifier::new(&fast_policy()).unwrap()
}

pub fn token_service() -> TokenService {
    TokenService::new(&TokenConfig::new(TEST_SECRET))
}

/// Retries without real waiting.
pub fn fast_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        initial_delay_ms: 1,
        max_delay_ms: 2,
        backoff_multiplier: 2.0,
        jitter: false,
    }
}

pub fn directory_over(store: Arc<dyn UserStore>) -> UserDirectory {
    UserDirectory::new(store, fast_verifier()).with_retry(fast_retry(3))
}

pub fn memory_directory() -> (UserDirectory, MemoryUserStore) {
    let store = MemoryUserStore::new();
    (directory_over(Arc::new(store.clone())), store)
}

pub fn memory_service() -> IdentityService {
    let (directory, _) = memory_directory();
    IdentityService::new(directory, token_service())
}

/// In-memory SQLite store with the schema applied
pub async fn sqlite_store() -> SqliteUserStore {
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1) // In-memory needs single connection
        .connect_with(options)
        .await
        .expect("Failed to create test pool");

    idm_db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    SqliteUserStore::new(pool)
}

pub async fn sqlite_service() -> IdentityService {
    let store = sqlite_store().await;
    IdentityService::new(directory_over(Arc::new(store)), token_service())
}

pub fn candidate(username: &str) -> NewUser {
    NewUser::new(username, format!("{username}@x.com"), PASSWORD)
}

/// Register `username` with `role` directly through the directory and log in.
pub async fn seed_and_login(service: &IdentityService, username: &str, role: Role) -> String {
    service
        .directory()
        .register(candidate(username).with_role(role))
        .await
        .unwrap();

    service
        .login(username, PASSWORD, None)
        .await
        .unwrap()
        .access_token
}

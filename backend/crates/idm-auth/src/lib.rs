pub mod access_guard;
pub mod access_token;
pub mod action;
pub mod bearer;
pub mod claims;
pub mod credential_verifier;
pub mod decision;
pub mod error;
pub mod password_policy;
pub mod token_config;
pub mod token_service;

pub use access_guard::authorize;
pub use access_token::AccessToken;
pub use action::Action;
pub use bearer::extract_bearer;
pub use claims::Claims;
pub use credential_verifier::CredentialVerifier;
pub use decision::Decision;
pub use error::{AuthError, Result};
pub use password_policy::PasswordPolicy;
pub use token_config::TokenConfig;
pub use token_service::TokenService;

pub const TOKEN_TYPE: &str = "bearer";
pub const DEFAULT_ACCESS_TOKEN_MINUTES: i64 = 30;

#[cfg(test)]
mod tests;

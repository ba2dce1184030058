//! One-way password hashing and verification.
//!
//! Hashes are Argon2id PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`).
//! Verification always re-derives with the parameters embedded in the stored
//! string, never with the current policy.

use crate::{AuthError, PasswordPolicy, Result as AuthErrorResult};

use std::panic::Location;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use error_location::ErrorLocation;

#[derive(Clone)]
pub struct CredentialVerifier {
    argon2: Argon2<'static>,
    params: Params,
}

impl CredentialVerifier {
    #[track_caller]
    pub fn new(policy: &PasswordPolicy) -> AuthErrorResult<Self> {
        let params = Params::new(
            policy.memory_kib,
            policy.iterations,
            policy.parallelism,
            None,
        )
        .map_err(|e| AuthError::Crypto {
            message: format!("Invalid Argon2 parameters: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone()),
            params,
        })
    }

    /// Hash a password with a fresh random salt.
    #[track_caller]
    pub fn hash(&self, password: &str) -> AuthErrorResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Crypto {
                message: format!("Hashing failed: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Check a password against a stored hash.
    ///
    /// A mismatch is `Ok(false)`. Only a structurally malformed hash (or an
    /// internal library fault) is an error.
    #[track_caller]
    pub fn verify(&self, password: &str, hash: &str) -> AuthErrorResult<bool> {
        let parsed = Self::parse(hash)?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::Crypto {
                message: format!("Verification failed: {e}"),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    /// Whether a stored hash was produced under a different policy than the current one.
    #[track_caller]
    pub fn needs_rehash(&self, hash: &str) -> AuthErrorResult<bool> {
        let parsed = Self::parse(hash)?;

        if parsed.algorithm != Algorithm::Argon2id.ident() {
            return Ok(true);
        }

        let stored = Params::try_from(&parsed).map_err(|e| AuthError::Crypto {
            message: format!("Unreadable hash parameters: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(stored.m_cost() != self.params.m_cost()
            || stored.t_cost() != self.params.t_cost()
            || stored.p_cost() != self.params.p_cost())
    }

    #[track_caller]
    fn parse(hash: &str) -> AuthErrorResult<PasswordHash<'_>> {
        PasswordHash::new(hash).map_err(|e| AuthError::Crypto {
            message: format!("Malformed password hash: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

impl std::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVerifier")
            .field("m_cost", &self.params.m_cost())
            .field("t_cost", &self.params.t_cost())
            .field("p_cost", &self.params.p_cost())
            .finish()
    }
}

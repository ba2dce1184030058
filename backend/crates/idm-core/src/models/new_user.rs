//! Registration candidate.

use crate::validation::{validate_email, validate_password, validate_username};
use crate::{Result as CoreErrorResult, Role};

use serde::Deserialize;

/// Everything needed to register a user. Role defaults to `user`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            full_name: None,
            password: password.into(),
            role: Role::User,
        }
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    #[track_caller]
    pub fn validate(&self) -> CoreErrorResult<()> {
        validate_username(&self.username)?;
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        Ok(())
    }
}

// Keeps the plaintext password out of debug logs.
impl std::fmt::Display for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}> ({})", self.username, self.email, self.role)
    }
}

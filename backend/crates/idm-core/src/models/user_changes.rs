//! Partial update of a directory user.

use crate::validation::{validate_email, validate_username};
use crate::{Result as CoreErrorResult, Role};

use serde::Deserialize;

/// Fields a caller wants changed. `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

impl UserChanges {
    pub fn changes_role(&self) -> bool {
        self.role.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.full_name.is_none()
            && self.role.is_none()
            && self.is_active.is_none()
    }

    #[track_caller]
    pub fn validate(&self) -> CoreErrorResult<()> {
        if let Some(username) = &self.username {
            validate_username(username)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}

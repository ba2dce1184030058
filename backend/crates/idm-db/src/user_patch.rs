use crate::UserDocument;

use idm_core::{Role, UserChanges};

use chrono::{DateTime, Utc};

/// Field-level update applied by `UserStore::update_one`. `None` leaves a field untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub password_hash: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl UserPatch {
    pub fn new(updated_at: DateTime<Utc>) -> Self {
        Self {
            username: None,
            email: None,
            full_name: None,
            role: None,
            is_active: None,
            password_hash: None,
            updated_at,
        }
    }

    pub fn from_changes(changes: UserChanges, updated_at: DateTime<Utc>) -> Self {
        Self {
            username: changes.username,
            email: changes.email,
            full_name: changes.full_name,
            role: changes.role,
            is_active: changes.is_active,
            password_hash: None,
            updated_at,
        }
    }

    pub fn with_password_hash(mut self, password_hash: String) -> Self {
        self.password_hash = Some(password_hash);
        self
    }

    pub fn apply_to(&self, doc: &mut UserDocument) {
        if let Some(username) = &self.username {
            doc.username = username.clone();
        }
        if let Some(email) = &self.email {
            doc.email = email.clone();
        }
        if let Some(full_name) = &self.full_name {
            doc.full_name = Some(full_name.clone());
        }
        if let Some(role) = self.role {
            doc.role = role;
        }
        if let Some(is_active) = self.is_active {
            doc.is_active = is_active;
        }
        if let Some(password_hash) = &self.password_hash {
            doc.password_hash = password_hash.clone();
        }
        doc.updated_at = self.updated_at;
    }
}

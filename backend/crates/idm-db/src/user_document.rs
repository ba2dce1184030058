use idm_core::{Role, User};

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Persisted form of a user: everything in `User` plus the credential hash.
///
/// Only the directory builds these; reads hand out `User` via `into_user`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDocument {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserDocument {
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            username: self.username,
            email: self.email,
            full_name: self.full_name,
            role: self.role,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

use crate::UserDocument;

use idm_core::Role;

use uuid::Uuid;

/// Equality filter over a single indexed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    All,
    Id(Uuid),
    Username(String),
    Email(String),
    Role(Role),
}

impl UserFilter {
    pub fn matches(&self, doc: &UserDocument) -> bool {
        match self {
            Self::All => true,
            Self::Id(id) => doc.id == *id,
            Self::Username(username) => doc.username == *username,
            Self::Email(email) => doc.email == *email,
            Self::Role(role) => doc.role == *role,
        }
    }
}

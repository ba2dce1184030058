
use crate::UserDocument;

use idm_core::{ErrorLocation, Role};

use std::panic::Location;

use chrono::{Duration, Utc};
use uuid::Uuid;

/// Document with distinct username/email, created `offset_secs` after a fixed base.
pub(crate) fn doc(username: &str, offset_secs: i64) -> UserDocument {
    let created = Utc::now() - Duration::hours(1) + Duration::seconds(offset_secs);
    UserDocument {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        full_name: None,
        role: Role::User,
        is_active: true,
        password_hash: "$argon2id$v=19$m=1024,t=1,p=1$c2FsdHNhbHQ$aGFzaA".to_string(),
        created_at: created,
        updated_at: created,
    }
}

pub(crate) fn location() -> ErrorLocation {
    ErrorLocation::from(Location::caller())
}

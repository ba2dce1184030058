#![allow(dead_code)]

use idm_core::Role;
use idm_db::UserDocument;

use chrono::{Duration, SubsecRound, Utc};
use uuid::Uuid;

/// Creates a test user document; `order` spaces creation times one second apart.
pub fn create_test_document(username: &str, order: i64) -> UserDocument {
    // Storage keeps millisecond precision
    let created = (Utc::now() - Duration::hours(1) + Duration::seconds(order)).trunc_subsecs(3);
    UserDocument {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        full_name: Some(format!("{username} test")),
        role: Role::User,
        is_active: true,
        password_hash: "$argon2id$v=19$m=1024,t=1,p=1$c2FsdHNhbHQ$aGFzaA".to_string(),
        created_at: created,
        updated_at: created,
    }
}

pub fn create_test_admin(username: &str, order: i64) -> UserDocument {
    UserDocument {
        role: Role::Admin,
        ..create_test_document(username, order)
    }
}

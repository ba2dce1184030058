
use crate::{CredentialVerifier, PasswordPolicy};

use idm_core::{Role, User};

use chrono::Utc;
use uuid::Uuid;

/// Cheapest parameters argon2 accepts, so tests do not pay production cost.
pub(crate) fn fast_policy() -> PasswordPolicy {
    PasswordPolicy {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    }
}

pub(crate) fn fast_verifier() -> CredentialVerifier {
    CredentialVerifier::new(&fast_policy()).unwrap()
}

pub(crate) fn user_with_role(role: Role) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        username: "alice".to_string(),
        email: "a@x.com".to_string(),
        full_name: None,
        role,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

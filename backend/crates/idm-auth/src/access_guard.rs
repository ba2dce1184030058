//! Role-based authorization for directory operations.
//!
//! Decides from validated claims alone: no storage lookups, no side effects.
//! Anything not explicitly allowed is denied, including every request whose
//! role claim is missing or unrecognized.

use crate::{Action, Claims, Decision};

use idm_core::Role;

use log::debug;
use uuid::Uuid;

/// `target` is the user the action applies to; `None` for collection actions.
pub fn authorize(claims: &Claims, action: Action, target: Option<Uuid>) -> Decision {
    let decision = decide(claims, action, target);

    if !decision.is_allowed() {
        debug!(
            "Denied {:?} on {:?} for subject {} (role claim '{}')",
            action, target, claims.sub, claims.role
        );
    }

    decision
}

fn decide(claims: &Claims, action: Action, target: Option<Uuid>) -> Decision {
    let Some(role) = claims.role() else {
        return Decision::Deny;
    };
    let is_self = target.is_some_and(|id| claims.is_subject(id));

    let allowed = match (action, role) {
        (Action::ListUsers, Role::Admin) => true,
        (Action::ListUsers, Role::User) => false,

        (Action::ReadProfile, _) if is_self => true,
        (Action::ReadProfile, Role::Admin) => target.is_some(),
        (Action::ReadProfile, Role::User) => false,

        // Nobody changes their own role, admins included.
        (Action::UpdateProfile { changes_role }, _) if is_self => !changes_role,
        (Action::UpdateProfile { .. }, Role::Admin) => target.is_some(),
        (Action::UpdateProfile { .. }, Role::User) => false,

        (Action::DeleteUser, Role::Admin) => target.is_some() && !is_self,
        (Action::DeleteUser, Role::User) => false,
    };

    if allowed {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

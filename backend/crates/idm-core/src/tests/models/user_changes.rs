use crate::{Role, UserChanges};

use googletest::prelude::*;

#[test]
fn test_default_changes_are_empty() {
    let changes = UserChanges::default();

    assert!(changes.is_empty());
    assert!(!changes.changes_role());
}

#[test]
fn test_role_change_is_detected() {
    let changes = UserChanges {
        role: Some(Role::Admin),
        ..Default::default()
    };

    assert!(changes.changes_role());
    assert!(!changes.is_empty());
}

#[test]
fn given_invalid_username_in_changes_when_validated_then_error() {
    let changes = UserChanges {
        username: Some("ab".to_string()),
        ..Default::default()
    };

    assert_that!(changes.validate(), err(anything()));
}

#[test]
fn given_partial_json_when_deserialized_then_missing_fields_are_none() {
    let changes: UserChanges = serde_json::from_str(r#"{"full_name":"Alice A."}"#).unwrap();

    assert_that!(changes.full_name, some(eq("Alice A.")));
    assert_that!(changes.username, none());
    assert_that!(changes.role, none());
}

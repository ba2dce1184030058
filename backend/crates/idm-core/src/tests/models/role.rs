use crate::Role;

use std::str::FromStr;

use googletest::prelude::*;

#[test]
fn test_role_as_str() {
    assert_eq!(Role::Admin.as_str(), "admin");
    assert_eq!(Role::User.as_str(), "user");
}

#[test]
fn test_role_from_str() {
    assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
    assert_eq!(Role::from_str("user").unwrap(), Role::User);
    assert!(Role::from_str("superuser").is_err());
    assert!(Role::from_str("").is_err());
}

#[test]
fn test_role_from_str_is_case_sensitive() {
    assert!(Role::from_str("ADMIN").is_err());
}

#[test]
fn test_role_default() {
    assert_eq!(Role::default(), Role::User);
}

#[test]
fn given_role_when_serialized_then_lowercase_string() {
    // When
    let json = serde_json::to_string(&Role::Admin).unwrap();

    // Then
    assert_that!(json.as_str(), eq("\"admin\""));
    let parsed: Role = serde_json::from_str(&json).unwrap();
    assert_that!(parsed, eq(Role::Admin));
}

#[test]
fn given_unknown_role_string_when_deserialized_then_error() {
    let parsed = serde_json::from_str::<Role>("\"root\"");

    assert_that!(parsed, err(anything()));
}

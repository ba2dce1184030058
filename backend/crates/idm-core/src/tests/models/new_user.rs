use crate::{CoreError, NewUser, Role};

use googletest::prelude::*;

#[test]
fn given_minimal_candidate_when_built_then_role_defaults_to_user() {
    let candidate = NewUser::new("alice", "a@x.com", "secret1");

    assert_that!(candidate.role, eq(Role::User));
    assert_that!(candidate.full_name, none());
    assert_that!(candidate.validate(), ok(anything()));
}

#[test]
fn given_json_without_role_when_deserialized_then_role_is_user() {
    // Given
    let json = r#"{"username":"alice","email":"a@x.com","password":"secret1"}"#;

    // When
    let candidate: NewUser = serde_json::from_str(json).unwrap();

    // Then
    assert_that!(candidate.role, eq(Role::User));
}

#[test]
fn given_short_password_when_validated_then_password_field_error() {
    let candidate = NewUser::new("alice", "a@x.com", "12345");

    let result = candidate.validate();

    assert!(matches!(
        result,
        Err(CoreError::Validation { field: "password", .. })
    ));
}

#[test]
fn given_bad_email_when_validated_then_email_field_error() {
    let candidate = NewUser::new("alice", "not-an-email", "secret1");

    let result = candidate.validate();

    assert!(matches!(
        result,
        Err(CoreError::Validation { field: "email", .. })
    ));
}

#[test]
fn given_candidate_when_displayed_then_password_is_not_printed() {
    let candidate = NewUser::new("alice", "a@x.com", "hunter22").with_role(Role::Admin);

    let shown = candidate.to_string();

    assert_that!(shown.as_str(), not(contains_substring("hunter22")));
    assert_that!(shown.as_str(), contains_substring("admin"));
}

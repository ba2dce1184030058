//! Field-shape rules shared by registration and updates.

use crate::{
    CoreError, MAX_USERNAME_LENGTH, MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH,
    Result as CoreErrorResult,
};

use std::panic::Location;

use error_location::ErrorLocation;
use validator::ValidateEmail;

#[track_caller]
pub fn validate_username(username: &str) -> CoreErrorResult<()> {
    let length = username.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&length) {
        return Err(CoreError::Validation {
            field: "username",
            message: format!(
                "must be {}-{} characters, got {}",
                MIN_USERNAME_LENGTH, MAX_USERNAME_LENGTH, length
            ),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    // '@' is how login tells an email from a username
    if username.contains('@') {
        return Err(CoreError::Validation {
            field: "username",
            message: "must not contain '@'".to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    Ok(())
}

#[track_caller]
pub fn validate_email(email: &str) -> CoreErrorResult<()> {
    if !email.validate_email() {
        return Err(CoreError::Validation {
            field: "email",
            message: "is not a valid email address".to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    Ok(())
}

#[track_caller]
pub fn validate_password(password: &str) -> CoreErrorResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation {
            field: "password",
            message: format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    Ok(())
}

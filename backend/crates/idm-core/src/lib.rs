pub mod error;
pub mod models;
pub mod validation;

pub use error::{CoreError, Result};
pub use models::new_user::NewUser;
pub use models::role::Role;
pub use models::user::User;
pub use models::user_changes::UserChanges;

pub use error_location::ErrorLocation;

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 50;
pub const MIN_PASSWORD_LENGTH: usize = 6;

#[cfg(test)]
mod tests;

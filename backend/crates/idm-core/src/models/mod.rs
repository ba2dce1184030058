pub mod new_user;
pub mod role;
pub mod user;
pub mod user_changes;

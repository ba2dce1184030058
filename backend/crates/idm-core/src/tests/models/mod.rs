mod new_user;
mod role;
mod user_changes;

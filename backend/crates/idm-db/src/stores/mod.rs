pub mod memory_user_store;
pub mod sqlite_user_store;

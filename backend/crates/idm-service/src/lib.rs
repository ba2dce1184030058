pub mod error;
pub mod identity_service;
pub mod list_query;
pub mod user_directory;

pub use error::{IdmError, Result};
pub use identity_service::IdentityService;
pub use list_query::ListQuery;
pub use user_directory::UserDirectory;

pub const DEFAULT_LIST_LIMIT: u32 = 100;
pub const MAX_LIST_LIMIT: u32 = 100;
pub const DEFAULT_OPERATION_TIMEOUT_MS: u64 = 5_000;

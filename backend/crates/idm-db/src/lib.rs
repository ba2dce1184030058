pub mod connection;
pub mod error;
pub mod retry;
pub mod stores;
pub mod user_document;
pub mod user_filter;
pub mod user_patch;
pub mod user_store;

pub use connection::{open_pool, run_migrations};
pub use error::{DbError, Result};
pub use retry::{IsRetryable, with_retry};
pub use stores::memory_user_store::MemoryUserStore;
pub use stores::sqlite_user_store::SqliteUserStore;
pub use user_document::UserDocument;
pub use user_filter::UserFilter;
pub use user_patch::UserPatch;
pub use user_store::UserStore;

pub use idm_config::RetryPolicy;

#[cfg(test)]
mod tests;

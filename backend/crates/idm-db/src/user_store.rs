use crate::{Result as DbErrorResult, UserDocument, UserFilter, UserPatch};

use async_trait::async_trait;

/// CRUD primitives over user documents.
///
/// Implementations must enforce uniqueness of `username` and `email` at the
/// storage level and report a collision as `DbError::UniqueViolation`. Callers
/// may pre-check, but only this constraint is authoritative under concurrency.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_one(&self, filter: &UserFilter) -> DbErrorResult<Option<UserDocument>>;

    /// Matching documents ordered by creation time.
    async fn find(
        &self,
        filter: &UserFilter,
        skip: u32,
        limit: u32,
    ) -> DbErrorResult<Vec<UserDocument>>;

    async fn insert_one(&self, doc: &UserDocument) -> DbErrorResult<()>;

    /// Returns the number of documents modified (0 or 1).
    async fn update_one(&self, filter: &UserFilter, patch: &UserPatch) -> DbErrorResult<u64>;

    /// Returns the number of documents removed (0 or 1).
    async fn delete_one(&self, filter: &UserFilter) -> DbErrorResult<u64>;
}

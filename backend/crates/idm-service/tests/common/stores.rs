//! `UserStore` doubles for fault and race injection.

use idm_db::{
    DbError, MemoryUserStore, Result as DbResult, UserDocument, UserFilter, UserPatch,
    UserStore,
};

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

/// Lookups by username/email always miss, as if a concurrent writer had not
/// committed yet. Writes still hit the real constraints.
#[derive(Clone, Default)]
pub struct StaleReadStore {
    pub inner: MemoryUserStore,
}

#[async_trait]
impl UserStore for StaleReadStore {
    async fn find_one(&self, filter: &UserFilter) -> DbResult<Option<UserDocument>> {
        match filter {
            UserFilter::Username(_) | UserFilter::Email(_) => Ok(None),
            _ => self.inner.find_one(filter).await,
        }
    }

    async fn find(&self, filter: &UserFilter, skip: u32, limit: u32) -> DbResult<Vec<UserDocument>> {
        self.inner.find(filter, skip, limit).await
    }

    async fn insert_one(&self, doc: &UserDocument) -> DbResult<()> {
        self.inner.insert_one(doc).await
    }

    async fn update_one(&self, filter: &UserFilter, patch: &UserPatch) -> DbResult<u64> {
        self.inner.update_one(filter, patch).await
    }

    async fn delete_one(&self, filter: &UserFilter) -> DbResult<u64> {
        self.inner.delete_one(filter).await
    }
}

/// Every call sleeps before delegating.
#[derive(Clone)]
pub struct SlowStore {
    pub inner: MemoryUserStore,
    pub delay: Duration,
}

#[async_trait]
impl UserStore for SlowStore {
    async fn find_one(&self, filter: &UserFilter) -> DbResult<Option<UserDocument>> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_one(filter).await
    }

    async fn find(&self, filter: &UserFilter, skip: u32, limit: u32) -> DbResult<Vec<UserDocument>> {
        tokio::time::sleep(self.delay).await;
        self.inner.find(filter, skip, limit).await
    }

    async fn insert_one(&self, doc: &UserDocument) -> DbResult<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.insert_one(doc).await
    }

    async fn update_one(&self, filter: &UserFilter, patch: &UserPatch) -> DbResult<u64> {
        tokio::time::sleep(self.delay).await;
        self.inner.update_one(filter, patch).await
    }

    async fn delete_one(&self, filter: &UserFilter) -> DbResult<u64> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete_one(filter).await
    }
}

/// Fails the first `failures` calls of each kind with a transient pool error.
#[derive(Clone, Default)]
pub struct FlakyStore {
    pub inner: MemoryUserStore,
    pub failures: u32,
    pub reads: Arc<AtomicU32>,
    pub inserts: Arc<AtomicU32>,
}

impl FlakyStore {
    pub fn failing(failures: u32) -> Self {
        Self {
            failures,
            ..Self::default()
        }
    }

    fn transient(counter: &AtomicU32, failures: u32) -> DbResult<()> {
        if counter.fetch_add(1, Ordering::SeqCst) < failures {
            return Err(DbError::from(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for FlakyStore {
    async fn find_one(&self, filter: &UserFilter) -> DbResult<Option<UserDocument>> {
        Self::transient(&self.reads, self.failures)?;
        self.inner.find_one(filter).await
    }

    async fn find(&self, filter: &UserFilter, skip: u32, limit: u32) -> DbResult<Vec<UserDocument>> {
        Self::transient(&self.reads, self.failures)?;
        self.inner.find(filter, skip, limit).await
    }

    async fn insert_one(&self, doc: &UserDocument) -> DbResult<()> {
        Self::transient(&self.inserts, self.failures)?;
        self.inner.insert_one(doc).await
    }

    async fn update_one(&self, filter: &UserFilter, patch: &UserPatch) -> DbResult<u64> {
        self.inner.update_one(filter, patch).await
    }

    async fn delete_one(&self, filter: &UserFilter) -> DbResult<u64> {
        self.inner.delete_one(filter).await
    }
}

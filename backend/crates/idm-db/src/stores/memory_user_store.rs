use crate::{
    DbError, Result as DbErrorResult, UserDocument, UserFilter, UserPatch, UserStore,
};

use idm_core::ErrorLocation;

use std::collections::HashMap;
use std::panic::Location;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local `UserStore`. Uniqueness is checked and the write applied
/// under one write lock, so it holds under concurrent callers.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    docs: Arc<RwLock<HashMap<Uuid, UserDocument>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }

    fn sorted_matches<'a>(
        docs: &'a HashMap<Uuid, UserDocument>,
        filter: &UserFilter,
    ) -> Vec<&'a UserDocument> {
        let mut matches: Vec<_> = docs.values().filter(|doc| filter.matches(doc)).collect();
        matches.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        matches
    }

    #[track_caller]
    fn check_unique(
        docs: &HashMap<Uuid, UserDocument>,
        candidate: &UserDocument,
    ) -> DbErrorResult<()> {
        for other in docs.values().filter(|other| other.id != candidate.id) {
            let field = if other.username == candidate.username {
                "username"
            } else if other.email == candidate.email {
                "email"
            } else {
                continue;
            };

            return Err(DbError::UniqueViolation {
                field: field.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_one(&self, filter: &UserFilter) -> DbErrorResult<Option<UserDocument>> {
        let docs = self.docs.read().await;
        Ok(Self::sorted_matches(&docs, filter).first().map(|doc| (*doc).clone()))
    }

    async fn find(
        &self,
        filter: &UserFilter,
        skip: u32,
        limit: u32,
    ) -> DbErrorResult<Vec<UserDocument>> {
        let docs = self.docs.read().await;
        Ok(Self::sorted_matches(&docs, filter)
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn insert_one(&self, doc: &UserDocument) -> DbErrorResult<()> {
        let mut docs = self.docs.write().await;

        if docs.contains_key(&doc.id) {
            return Err(DbError::UniqueViolation {
                field: "id".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Self::check_unique(&docs, doc)?;

        docs.insert(doc.id, doc.clone());
        Ok(())
    }

    async fn update_one(&self, filter: &UserFilter, patch: &UserPatch) -> DbErrorResult<u64> {
        let mut docs = self.docs.write().await;

        let Some(id) = Self::sorted_matches(&docs, filter).first().map(|doc| doc.id) else {
            return Ok(0);
        };
        let Some(current) = docs.get(&id) else {
            return Ok(0);
        };

        let mut updated = current.clone();
        patch.apply_to(&mut updated);
        Self::check_unique(&docs, &updated)?;

        docs.insert(id, updated);
        Ok(1)
    }

    async fn delete_one(&self, filter: &UserFilter) -> DbErrorResult<u64> {
        let mut docs = self.docs.write().await;

        let Some(id) = Self::sorted_matches(&docs, filter).first().map(|doc| doc.id) else {
            return Ok(0);
        };

        Ok(docs.remove(&id).map_or(0, |_| 1))
    }
}

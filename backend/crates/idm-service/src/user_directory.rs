//! Owner of user records.
//!
//! Uniqueness of `username` and `email` is a check-then-act against shared
//! storage. The pre-checks here only produce a friendly `Conflict` early;
//! the store's unique constraint is the authority and any violation it
//! reports surfaces as the same `Conflict`.

use crate::{DEFAULT_OPERATION_TIMEOUT_MS, IdmError, ListQuery, Result as IdmErrorResult};

use idm_auth::CredentialVerifier;
use idm_core::validation::validate_password;
use idm_core::{NewUser, User, UserChanges};
use idm_db::{
    DbError, RetryPolicy, UserDocument, UserFilter, UserPatch, UserStore, with_retry,
};

use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SubsecRound, Utc};
use error_location::ErrorLocation;
use log::{debug, info, warn};
use tokio::task::spawn_blocking;
use tokio::time::timeout;
use uuid::Uuid;

#[derive(Clone)]
pub struct UserDirectory {
    store: Arc<dyn UserStore>,
    verifier: CredentialVerifier,
    deadline: Duration,
    retry: RetryPolicy,
}

impl UserDirectory {
    pub fn new(store: Arc<dyn UserStore>, verifier: CredentialVerifier) -> Self {
        Self {
            store,
            verifier,
            deadline: Duration::from_millis(DEFAULT_OPERATION_TIMEOUT_MS),
            retry: RetryPolicy::default(),
        }
    }

    /// Override the deadline applied to each directory operation.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    // =========================================================================
    // Operations
    // =========================================================================

    pub async fn register(&self, candidate: NewUser) -> IdmErrorResult<User> {
        candidate.validate()?;

        self.within("register", async move {
            if self.find(UserFilter::Email(candidate.email.clone())).await?.is_some() {
                return Err(conflict("email"));
            }
            if self.find(UserFilter::Username(candidate.username.clone())).await?.is_some() {
                return Err(conflict("username"));
            }

            let password_hash = self.hash_password(candidate.password).await?;

            let now = stamp();
            let doc = UserDocument {
                id: Uuid::new_v4(),
                username: candidate.username,
                email: candidate.email,
                full_name: candidate.full_name,
                role: candidate.role,
                is_active: true,
                password_hash,
                created_at: now,
                updated_at: now,
            };

            // A concurrent registration can pass both pre-checks; the store's
            // unique constraint then rejects this insert as Conflict.
            self.write(self.store.insert_one(&doc)).await?;

            info!("Registered user {} ({}, role={})", doc.id, doc.username, doc.role);

            Ok(doc.into_user())
        })
        .await
    }

    pub async fn get(&self, id: Uuid) -> IdmErrorResult<Option<User>> {
        self.within("get", async {
            Ok(self
                .find(UserFilter::Id(id))
                .await?
                .map(UserDocument::into_user))
        })
        .await
    }

    pub async fn list(&self, query: ListQuery) -> IdmErrorResult<Vec<User>> {
        query.validate()?;

        let filter = query.role.map_or(UserFilter::All, UserFilter::Role);
        self.within("list", async {
            let docs = self
                .read("find", || self.store.find(&filter, query.skip, query.limit))
                .await?;

            Ok(docs.into_iter().map(UserDocument::into_user).collect())
        })
        .await
    }

    /// Apply `changes` to user `id`. `Ok(None)` when the user does not exist.
    pub async fn update(&self, id: Uuid, changes: UserChanges) -> IdmErrorResult<Option<User>> {
        changes.validate()?;

        self.within("update", async move {
            let Some(current) = self.find(UserFilter::Id(id)).await? else {
                return Ok(None);
            };

            if changes.is_empty() {
                return Ok(Some(current.into_user()));
            }

            if let Some(email) = changes.email.as_ref().filter(|e| **e != current.email) {
                self.ensure_free(UserFilter::Email(email.clone()), id, "email")
                    .await?;
            }
            if let Some(username) = changes
                .username
                .as_ref()
                .filter(|u| **u != current.username)
            {
                self.ensure_free(UserFilter::Username(username.clone()), id, "username")
                    .await?;
            }

            let patch = UserPatch::from_changes(changes, stamp().max(current.created_at));
            let modified = self
                .write(self.store.update_one(&UserFilter::Id(id), &patch))
                .await?;

            if modified == 0 {
                // Deleted between the read and the write
                return Ok(None);
            }

            debug!("Updated user {}", id);

            Ok(self.find(UserFilter::Id(id)).await?.map(UserDocument::into_user))
        })
        .await
    }

    /// Whether a record existed and was removed.
    pub async fn delete(&self, id: Uuid) -> IdmErrorResult<bool> {
        let removed = self
            .within("delete", self.write(self.store.delete_one(&UserFilter::Id(id))))
            .await?;

        if removed > 0 {
            info!("Deleted user {}", id);
        }

        Ok(removed > 0)
    }

    /// Resolve `identifier` (email if it contains '@', else username) and check
    /// the password.
    ///
    /// Unknown user and wrong password both yield `Ok(None)` after the same
    /// amount of hashing work.
    pub async fn authenticate(
        &self,
        identifier: &str,
        password: &str,
    ) -> IdmErrorResult<Option<User>> {
        let filter = if identifier.contains('@') {
            UserFilter::Email(identifier.to_string())
        } else {
            UserFilter::Username(identifier.to_string())
        };

        let verified = self
            .within("authenticate", async {
                let Some(doc) = self.find(filter).await? else {
                    // Throwaway hash so the unknown-user path costs as much as a verify
                    self.hash_password(password.to_string()).await?;
                    return Ok(None);
                };

                let matches = self
                    .verify_password(password.to_string(), doc.password_hash.clone())
                    .await?;

                Ok(matches.then_some(doc))
            })
            .await?;

        let Some(doc) = verified else {
            return Ok(None);
        };

        self.upgrade_hash_if_needed(&doc, password).await;

        Ok(Some(doc.into_user()))
    }

    /// Replace the password after verifying `current`. `Ok(false)` when the
    /// user is missing or `current` does not match.
    pub async fn change_password(
        &self,
        id: Uuid,
        current: &str,
        new_password: &str,
    ) -> IdmErrorResult<bool> {
        validate_password(new_password)?;

        self.within("change_password", async {
            let Some(doc) = self.find(UserFilter::Id(id)).await? else {
                return Ok(false);
            };

            if !self
                .verify_password(current.to_string(), doc.password_hash.clone())
                .await?
            {
                debug!("Password change rejected for user {}", id);
                return Ok(false);
            }

            let password_hash = self.hash_password(new_password.to_string()).await?;
            let patch =
                UserPatch::new(stamp().max(doc.created_at)).with_password_hash(password_hash);
            let modified = self
                .write(self.store.update_one(&UserFilter::Id(id), &patch))
                .await?;

            if modified > 0 {
                info!("Password changed for user {}", id);
            }

            Ok(modified > 0)
        })
        .await
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn ensure_free(
        &self,
        filter: UserFilter,
        owner: Uuid,
        field: &'static str,
    ) -> IdmErrorResult<()> {
        match self.find(filter).await? {
            Some(existing) if existing.id != owner => Err(conflict(field)),
            _ => Ok(()),
        }
    }

    async fn upgrade_hash_if_needed(&self, doc: &UserDocument, password: &str) {
        match self.verifier.needs_rehash(&doc.password_hash) {
            Ok(true) => {}
            Ok(false) => return,
            Err(e) => {
                warn!("Could not inspect stored hash for user {}: {}", doc.id, e);
                return;
            }
        }

        let result = self
            .within("rehash", async {
                let password_hash = self.hash_password(password.to_string()).await?;
                let patch =
                    UserPatch::new(stamp().max(doc.created_at)).with_password_hash(password_hash);
                self.write(self.store.update_one(&UserFilter::Id(doc.id), &patch))
                    .await
            })
            .await;

        // Login already succeeded; a failed upgrade is retried next login
        match result {
            Ok(_) => info!("Upgraded password hash parameters for user {}", doc.id),
            Err(e) => warn!("Password hash upgrade failed for user {}: {}", doc.id, e),
        }
    }

    async fn find(&self, filter: UserFilter) -> IdmErrorResult<Option<UserDocument>> {
        self.read("find_one", || self.store.find_one(&filter)).await
    }

    /// Reads retry transient faults.
    async fn read<T, F, Fut>(&self, operation: &'static str, op: F) -> IdmErrorResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DbError>>,
    {
        Ok(with_retry(&self.retry, operation, op).await?)
    }

    /// Writes run once: a retried insert or update could apply twice.
    async fn write<T, Fut>(&self, fut: Fut) -> IdmErrorResult<T>
    where
        Fut: Future<Output = Result<T, DbError>>,
    {
        Ok(fut.await?)
    }

    /// Run one directory operation under the deadline. Every storage call,
    /// retry wait and hash inside `body` draws on the same budget.
    #[track_caller]
    fn within<T, Fut>(
        &self,
        operation: &'static str,
        body: Fut,
    ) -> impl Future<Output = IdmErrorResult<T>>
    where
        Fut: Future<Output = IdmErrorResult<T>>,
    {
        let location = ErrorLocation::from(Location::caller());
        let deadline = self.deadline;

        async move {
            match timeout(deadline, body).await {
                Ok(result) => result,
                Err(_) => {
                    warn!("Directory operation {} timed out after {:?}", operation, deadline);
                    Err(IdmError::StorageTimeout {
                        operation: operation.to_string(),
                        timeout_ms: deadline.as_millis(),
                        location,
                    })
                }
            }
        }
    }

    async fn hash_password(&self, password: String) -> IdmErrorResult<String> {
        let verifier = self.verifier.clone();
        spawn_blocking(move || verifier.hash(&password))
            .await
            .map_err(join_failure)?
            .map_err(IdmError::from)
    }

    async fn verify_password(&self, password: String, hash: String) -> IdmErrorResult<bool> {
        let verifier = self.verifier.clone();
        spawn_blocking(move || verifier.verify(&password, &hash))
            .await
            .map_err(join_failure)?
            .map_err(IdmError::from)
    }
}

/// Now, at the millisecond precision the stores keep.
fn stamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

#[track_caller]
fn conflict(field: &str) -> IdmError {
    IdmError::Conflict {
        field: field.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}

#[track_caller]
fn join_failure(err: tokio::task::JoinError) -> IdmError {
    IdmError::CryptoFailure {
        message: format!("Hashing task failed: {err}"),
        location: ErrorLocation::from(Location::caller()),
    }
}

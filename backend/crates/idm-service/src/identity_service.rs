//! Token-gated entry points over the user directory.
//!
//! Every guarded operation validates the bearer token, confirms the subject
//! still exists and is active, and then asks the access guard. Authorization
//! uses the role in the token, so a role change takes effect at next login.

use crate::{IdmError, ListQuery, Result as IdmErrorResult, UserDirectory};

use idm_auth::{AccessToken, Action, Claims, TokenService, authorize, extract_bearer};
use idm_core::{NewUser, Role, User, UserChanges};

use chrono::Duration;
use log::{debug, info};
use uuid::Uuid;

pub struct IdentityService {
    directory: UserDirectory,
    tokens: TokenService,
}

impl IdentityService {
    pub fn new(directory: UserDirectory, tokens: TokenService) -> Self {
        Self { directory, tokens }
    }

    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Open registration: always creates a plain `user`, whatever role was asked for.
    pub async fn register(&self, candidate: NewUser) -> IdmErrorResult<User> {
        let candidate = candidate.with_role(Role::User);
        self.directory.register(candidate).await
    }

    /// Admin-created account; the candidate's role is honored.
    pub async fn create_user(&self, token: &str, candidate: NewUser) -> IdmErrorResult<User> {
        self.current_admin(token).await?;
        self.directory.register(candidate).await
    }

    /// Create the first admin. Refused once any admin exists.
    pub async fn bootstrap_admin(&self, candidate: NewUser) -> IdmErrorResult<User> {
        let existing = self
            .directory
            .list(ListQuery {
                skip: 0,
                limit: 1,
                role: Some(Role::Admin),
            })
            .await?;

        if !existing.is_empty() {
            return Err(IdmError::forbidden());
        }

        let admin = self
            .directory
            .register(candidate.with_role(Role::Admin))
            .await?;
        info!("Bootstrapped admin {} ({})", admin.id, admin.username);

        Ok(admin)
    }

    /// Exchange credentials for a bearer token.
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
        ttl: Option<Duration>,
    ) -> IdmErrorResult<AccessToken> {
        let Some(user) = self.directory.authenticate(identifier, password).await? else {
            debug!("Login failed");
            return Err(IdmError::auth_invalid());
        };

        if !user.is_active {
            debug!("Login refused for inactive user {}", user.id);
            return Err(IdmError::auth_invalid());
        }

        let token = self.tokens.issue(&user, ttl)?;
        info!("User {} logged in", user.id);

        Ok(token)
    }

    pub fn validate_token(&self, token: &str) -> IdmErrorResult<Claims> {
        Ok(self.tokens.validate(token)?)
    }

    /// The live, active user a token refers to.
    pub async fn current_user(&self, token: &str) -> IdmErrorResult<User> {
        let claims = self.validate_token(token)?;
        self.live_subject(&claims).await
    }

    /// Like `current_user`, but the stored user must also be an admin.
    pub async fn current_admin(&self, token: &str) -> IdmErrorResult<User> {
        let user = self.current_user(token).await?;
        if !user.is_admin() {
            return Err(IdmError::forbidden());
        }
        Ok(user)
    }

    /// Resolve an optional `Authorization` header.
    ///
    /// No header is anonymous (`Ok(None)`); a header that is present but
    /// malformed, invalid, expired or for a missing user is an error.
    pub async fn optional_current_user(
        &self,
        authorization: Option<&str>,
    ) -> IdmErrorResult<Option<User>> {
        let Some(header) = authorization else {
            return Ok(None);
        };

        let token = extract_bearer(Some(header))?;
        self.current_user(token).await.map(Some)
    }

    pub async fn read_me(&self, token: &str) -> IdmErrorResult<User> {
        let (_, me) = self.guard(token, Action::ReadProfile, Target::Subject).await?;
        Ok(me)
    }

    pub async fn update_me(&self, token: &str, changes: UserChanges) -> IdmErrorResult<User> {
        let action = Action::UpdateProfile {
            changes_role: changes.changes_role(),
        };
        let (claims, _) = self.guard(token, action, Target::Subject).await?;

        self.directory
            .update(claims.sub, changes)
            .await?
            .ok_or_else(|| IdmError::not_found(claims.sub))
    }

    pub async fn change_my_password(
        &self,
        token: &str,
        current: &str,
        new_password: &str,
    ) -> IdmErrorResult<bool> {
        let me = self.current_user(token).await?;
        self.directory
            .change_password(me.id, current, new_password)
            .await
    }

    pub async fn list_users(&self, token: &str, query: ListQuery) -> IdmErrorResult<Vec<User>> {
        self.guard(token, Action::ListUsers, Target::None).await?;
        self.directory.list(query).await
    }

    pub async fn read_user(&self, token: &str, id: Uuid) -> IdmErrorResult<User> {
        self.guard(token, Action::ReadProfile, Target::User(id))
            .await?;

        self.directory
            .get(id)
            .await?
            .ok_or_else(|| IdmError::not_found(id))
    }

    pub async fn update_user(
        &self,
        token: &str,
        id: Uuid,
        changes: UserChanges,
    ) -> IdmErrorResult<User> {
        let action = Action::UpdateProfile {
            changes_role: changes.changes_role(),
        };
        self.guard(token, action, Target::User(id)).await?;

        self.directory
            .update(id, changes)
            .await?
            .ok_or_else(|| IdmError::not_found(id))
    }

    pub async fn delete_user(&self, token: &str, id: Uuid) -> IdmErrorResult<()> {
        self.guard(token, Action::DeleteUser, Target::User(id))
            .await?;

        if !self.directory.delete(id).await? {
            return Err(IdmError::not_found(id));
        }
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn guard(
        &self,
        token: &str,
        action: Action,
        target: Target,
    ) -> IdmErrorResult<(Claims, User)> {
        let claims = self.validate_token(token)?;
        let subject = self.live_subject(&claims).await?;

        let target = match target {
            Target::None => None,
            Target::Subject => Some(claims.sub),
            Target::User(id) => Some(id),
        };

        if !authorize(&claims, action, target).is_allowed() {
            return Err(IdmError::forbidden());
        }

        Ok((claims, subject))
    }

    async fn live_subject(&self, claims: &Claims) -> IdmErrorResult<User> {
        match self.directory.get(claims.sub).await? {
            Some(user) if user.is_active => Ok(user),
            Some(_) => {
                debug!("Token subject {} is inactive", claims.sub);
                Err(IdmError::auth_invalid())
            }
            None => {
                debug!("Token subject {} no longer exists", claims.sub);
                Err(IdmError::auth_invalid())
            }
        }
    }
}

enum Target {
    None,
    Subject,
    User(Uuid),
}

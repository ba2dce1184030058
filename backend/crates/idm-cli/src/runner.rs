//! Executes one parsed command against the identity service.

use crate::{Commands, CliResult};

use idm_auth::AuthError;
use idm_core::{NewUser, Role, UserChanges};
use idm_service::{IdentityService, IdmError, ListQuery, Result as IdmErrorResult};

use std::panic::Location;

use error_location::ErrorLocation;
use serde_json::{Value, json};

/// Run `command` and return its JSON output.
pub async fn run(
    service: &IdentityService,
    command: Commands,
    token: Option<&str>,
) -> CliResult<Value> {
    let value = match command {
        Commands::BootstrapAdmin {
            username,
            email,
            password,
            full_name,
        } => {
            let candidate = new_user(username, email, password, full_name);
            serde_json::to_value(service.bootstrap_admin(candidate).await?)?
        }

        Commands::Register {
            username,
            email,
            password,
            full_name,
        } => {
            let candidate = new_user(username, email, password, full_name);
            serde_json::to_value(service.register(candidate).await?)?
        }

        Commands::CreateUser {
            username,
            email,
            password,
            full_name,
            role,
        } => {
            let token = require_token(token)?;
            let candidate =
                new_user(username, email, password, full_name).with_role(parse_role(&role)?);
            serde_json::to_value(service.create_user(token, candidate).await?)?
        }

        Commands::Login {
            identifier,
            password,
            ttl_minutes,
        } => {
            let ttl = ttl_minutes.map(parse_ttl_minutes).transpose()?;
            serde_json::to_value(service.login(&identifier, &password, ttl).await?)?
        }

        Commands::Whoami => {
            let token = require_token(token)?;
            serde_json::to_value(service.read_me(token).await?)?
        }

        Commands::ListUsers { skip, limit, role } => {
            let token = require_token(token)?;
            let query = ListQuery {
                skip,
                limit,
                role: role.as_deref().map(parse_role).transpose()?,
            };
            serde_json::to_value(service.list_users(token, query).await?)?
        }

        Commands::GetUser { id } => {
            let token = require_token(token)?;
            serde_json::to_value(service.read_user(token, id).await?)?
        }

        Commands::UpdateUser {
            id,
            username,
            email,
            full_name,
            role,
            active,
        } => {
            let token = require_token(token)?;
            let changes = UserChanges {
                username,
                email,
                full_name,
                role: role.as_deref().map(parse_role).transpose()?,
                is_active: active,
            };
            serde_json::to_value(service.update_user(token, id, changes).await?)?
        }

        Commands::DeleteUser { id } => {
            let token = require_token(token)?;
            service.delete_user(token, id).await?;
            json!({ "deleted": id })
        }

        Commands::ChangePassword { current, new } => {
            let token = require_token(token)?;
            let changed = service.change_my_password(token, &current, &new).await?;
            json!({ "changed": changed })
        }
    };

    Ok(value)
}

/// JSON body written to stderr when a command fails with an `IdmError`.
pub fn error_body(error: &IdmError) -> Value {
    json!({
        "error": {
            "code": error.error_code(),
            "status": error.status_code().as_u16(),
            "message": error.client_message(),
        }
    })
}

fn new_user(
    username: String,
    email: String,
    password: String,
    full_name: Option<String>,
) -> NewUser {
    let candidate = NewUser::new(username, email, password);
    match full_name {
        Some(name) => candidate.with_full_name(name),
        None => candidate,
    }
}

fn parse_ttl_minutes(minutes: i64) -> IdmErrorResult<chrono::Duration> {
    chrono::Duration::try_minutes(minutes)
        .ok_or_else(|| IdmError::validation("ttl_minutes", format!("{minutes} is out of range")))
}

fn parse_role(value: &str) -> IdmErrorResult<Role> {
    Ok(value.parse::<Role>()?)
}

#[track_caller]
fn require_token(token: Option<&str>) -> IdmErrorResult<&str> {
    token.ok_or_else(|| {
        IdmError::from(AuthError::MissingHeader {
            location: ErrorLocation::from(Location::caller()),
        })
    })
}

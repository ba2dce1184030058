use idm_auth::AuthError;
use idm_core::CoreError;
use idm_db::DbError;

use std::panic::Location;

use error_location::ErrorLocation;
use http::StatusCode;
use thiserror::Error;

/// Caller-facing failure taxonomy for every directory and identity operation.
///
/// Display output is for logs. Clients should only see `error_code()` and
/// the status mapping; none of the authentication variants say whether the
/// identifier exists.
#[derive(Error, Debug)]
pub enum IdmError {
    #[error("Conflict: {field} already in use {location}")]
    Conflict {
        field: String,
        location: ErrorLocation,
    },

    #[error("Could not validate credentials {location}")]
    AuthInvalid { location: ErrorLocation },

    #[error("Invalid token: {message} {location}")]
    TokenInvalid {
        message: String,
        location: ErrorLocation,
    },

    #[error("Token expired {location}")]
    TokenExpired { location: ErrorLocation },

    #[error("Forbidden {location}")]
    Forbidden { location: ErrorLocation },

    #[error("User {id} not found {location}")]
    NotFound { id: String, location: ErrorLocation },

    #[error("Validation error on '{field}': {message} {location}")]
    Validation {
        field: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Credential processing failed: {message} {location}")]
    CryptoFailure {
        message: String,
        location: ErrorLocation,
    },

    #[error("Storage operation '{operation}' exceeded {timeout_ms}ms {location}")]
    StorageTimeout {
        operation: String,
        timeout_ms: u128,
        location: ErrorLocation,
    },

    #[error("Storage unavailable: {message} {location}")]
    StorageUnavailable {
        message: String,
        location: ErrorLocation,
    },
}

impl IdmError {
    #[track_caller]
    pub fn auth_invalid() -> Self {
        Self::AuthInvalid {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn forbidden() -> Self {
        Self::Forbidden {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            id: id.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Conflict { .. } => "CONFLICT",
            Self::AuthInvalid { .. } => "AUTH_INVALID",
            Self::TokenInvalid { .. } => "TOKEN_INVALID",
            Self::TokenExpired { .. } => "TOKEN_EXPIRED",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::CryptoFailure { .. } => "CRYPTO_FAILURE",
            Self::StorageTimeout { .. } => "STORAGE_TIMEOUT",
            Self::StorageUnavailable { .. } => "STORAGE_UNAVAILABLE",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::AuthInvalid { .. } | Self::TokenInvalid { .. } | Self::TokenExpired { .. } => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::CryptoFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::StorageTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::StorageUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// `WWW-Authenticate` challenge to send with a 401.
    pub fn www_authenticate(&self) -> Option<&'static str> {
        (self.status_code() == StatusCode::UNAUTHORIZED).then_some("Bearer")
    }

    /// Short message that is safe to show a client.
    pub fn client_message(&self) -> String {
        match self {
            Self::Conflict { field, .. } => format!("{field} already in use"),
            Self::AuthInvalid { .. } => "Incorrect username or password".to_string(),
            Self::TokenInvalid { .. } => "Could not validate credentials".to_string(),
            Self::TokenExpired { .. } => "Token has expired".to_string(),
            Self::Forbidden { .. } => "Not enough permissions".to_string(),
            Self::NotFound { id, .. } => format!("User with ID {id} not found"),
            Self::Validation { field, message, .. } => format!("{field}: {message}"),
            Self::CryptoFailure { .. } => "Internal error".to_string(),
            Self::StorageTimeout { .. } => "Storage timed out".to_string(),
            Self::StorageUnavailable { .. } => "Storage unavailable".to_string(),
        }
    }
}

impl From<AuthError> for IdmError {
    #[track_caller]
    fn from(err: AuthError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        match err {
            AuthError::TokenExpired { .. } => Self::TokenExpired { location },
            AuthError::JwtEncode { source, .. } => Self::CryptoFailure {
                message: source.to_string(),
                location,
            },
            AuthError::Crypto { message, .. } => Self::CryptoFailure { message, location },
            AuthError::InvalidTtl { message, .. } => Self::Validation {
                field: "ttl".to_string(),
                message,
                location,
            },
            other => Self::TokenInvalid {
                message: other.error_code().to_string(),
                location,
            },
        }
    }
}

impl From<DbError> for IdmError {
    #[track_caller]
    fn from(err: DbError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        match err {
            DbError::UniqueViolation { field, .. } => Self::Conflict { field, location },
            other => Self::StorageUnavailable {
                message: other.to_string(),
                location,
            },
        }
    }
}

impl From<CoreError> for IdmError {
    #[track_caller]
    fn from(err: CoreError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        let field = err.field().unwrap_or("request").to_string();
        match err {
            CoreError::Validation { message, .. } => Self::Validation {
                field,
                message,
                location,
            },
            CoreError::InvalidRole { value, .. } => Self::Validation {
                field,
                message: format!("unknown role '{value}'"),
                location,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, IdmError>;

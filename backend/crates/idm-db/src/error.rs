use idm_core::ErrorLocation;

use std::panic::Location;

use thiserror::Error;

// SQLite primary result codes (low byte of the extended code)
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLx error: {source} {location}")]
    Sqlx {
        source: sqlx::Error,
        location: ErrorLocation,
    },

    #[error("Migration error: {message} {location}")]
    Migration {
        message: String,
        location: ErrorLocation,
    },

    #[error("Database initialization failed: {message} {location}")]
    Initialization {
        message: String,
        location: ErrorLocation,
    },

    #[error("Unique constraint violated on '{field}' {location}")]
    UniqueViolation {
        field: String,
        location: ErrorLocation,
    },

    #[error("Corrupt user record: {message} {location}")]
    CorruptRecord {
        message: String,
        location: ErrorLocation,
    },
}

impl DbError {
    #[track_caller]
    pub fn corrupt<S: Into<String>>(message: S) -> Self {
        Self::CorruptRecord {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Sqlx { .. } => "STORAGE_ERROR",
            Self::Migration { .. } => "MIGRATION_FAILED",
            Self::Initialization { .. } => "STORAGE_INIT_FAILED",
            Self::UniqueViolation { .. } => "UNIQUE_VIOLATION",
            Self::CorruptRecord { .. } => "CORRUPT_RECORD",
        }
    }

    /// Transient faults worth another attempt: pool exhaustion, I/O, lock contention.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Sqlx { source, .. } => match source {
                sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => true,
                sqlx::Error::Database(db_err) => db_err
                    .code()
                    .and_then(|code| code.parse::<i32>().ok())
                    .is_some_and(|code| matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED)),
                _ => false,
            },
            _ => false,
        }
    }
}

impl From<sqlx::Error> for DbError {
    #[track_caller]
    fn from(source: sqlx::Error) -> Self {
        if let Some(field) = unique_violation_field(&source) {
            return Self::UniqueViolation {
                field,
                location: ErrorLocation::from(Location::caller()),
            };
        }

        Self::Sqlx {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    #[track_caller]
    fn from(source: sqlx::migrate::MigrateError) -> Self {
        Self::Migration {
            message: source.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// SQLite reports the offending column as "UNIQUE constraint failed: users.<column>".
fn unique_violation_field(error: &sqlx::Error) -> Option<String> {
    let db_err = error.as_database_error()?;
    if !db_err.is_unique_violation() {
        return None;
    }

    let message = db_err.message();
    let field = ["username", "email", "id"]
        .into_iter()
        .find(|column| message.contains(&format!("users.{column}")))
        .unwrap_or("unknown");

    Some(field.to_string())
}

pub type Result<T> = std::result::Result<T, DbError>;

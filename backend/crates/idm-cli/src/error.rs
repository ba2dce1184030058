use idm_auth::AuthError;
use idm_config::ConfigError;
use idm_db::DbError;
use idm_service::IdmError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Credential setup error: {0}")]
    Credentials(#[from] AuthError),

    #[error("{0}")]
    Idm(#[from] IdmError),

    #[error("Logger error: {message}")]
    Logger { message: String },

    #[error("Failed to serialize output: {0}")]
    Output(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;

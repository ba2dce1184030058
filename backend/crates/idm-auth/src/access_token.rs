use crate::Claims;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct AccessToken {
    pub access_token: String,
    /// Always "bearer"
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    #[serde(skip)]
    pub claims: Claims,
}

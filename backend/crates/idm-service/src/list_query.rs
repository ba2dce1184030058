use crate::{DEFAULT_LIST_LIMIT, IdmError, MAX_LIST_LIMIT, Result as IdmErrorResult};

use idm_core::Role;

use std::panic::Location;

use error_location::ErrorLocation;

/// Paging and filtering for directory listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub skip: u32,
    /// 1..=100
    pub limit: u32,
    pub role: Option<Role>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIST_LIMIT,
            role: None,
        }
    }
}

impl ListQuery {
    #[track_caller]
    pub fn validate(&self) -> IdmErrorResult<()> {
        if self.limit == 0 || self.limit > MAX_LIST_LIMIT {
            return Err(IdmError::Validation {
                field: "limit".to_string(),
                message: format!("must be 1-{}, got {}", MAX_LIST_LIMIT, self.limit),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}

//! Ownership guard for mutations
//!
//! Callers must load the resource first: a missing resource is reported
//! as not found before ownership is ever compared.

use crate::error::AppError;

/// Decision of the guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Allowed,
    Forbidden,
}

impl Authorization {
    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            Authorization::Allowed => Ok(()),
            Authorization::Forbidden => Err(AppError::Forbidden),
        }
    }
}

/// Compare the resolved caller with the resource owner
pub fn authorize_mutation(caller_id: &str, owner_id: &str) -> Authorization {
    if caller_id == owner_id {
        Authorization::Allowed
    } else {
        tracing::warn!(caller_id, owner_id, "mutation denied: caller is not the owner");
        Authorization::Forbidden
    }
}

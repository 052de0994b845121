//! Ownership authorization guard.
//!
//! A pure decision function consulted by every owner-gated mutation (post
//! edit, post delete, like toggle). The same rule applies to every resource
//! type; there are no per-resource special cases.

use crate::{error::AppError, models::user::User};
use uuid::Uuid;

/// Authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No identity attached to the request.
    Unauthenticated,
    /// Identity attached, but it is not the resource owner.
    Forbidden,
}

impl Decision {
    /// Map the decision onto the error taxonomy so handlers can use `?`.
    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(DenyReason::Unauthenticated) => Err(AppError::Unauthenticated),
            Decision::Deny(DenyReason::Forbidden) => Err(AppError::Forbidden),
        }
    }
}

/// Compare the authenticated identity to a resource's recorded owner.
pub fn authorize_owner(current: Option<&User>, owner_id: Uuid) -> Decision {
    match current {
        None => Decision::Deny(DenyReason::Unauthenticated),
        Some(user) if user.id == owner_id => Decision::Allow,
        Some(_) => Decision::Deny(DenyReason::Forbidden),
    }
}

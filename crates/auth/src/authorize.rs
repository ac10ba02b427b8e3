use thiserror::Error;

use stockline_core::{DomainError, UserId};

use crate::{Actor, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("role {actual} not allowed (requires one of: {required})")]
    RoleNotAllowed { actual: String, required: String },

    #[error("actor {actual} is not the assigned {what}")]
    IdentityMismatch { actual: UserId, what: &'static str },
}

impl From<AuthzError> for DomainError {
    fn from(value: AuthzError) -> Self {
        DomainError::Forbidden(value.to_string())
    }
}

/// Require the actor to hold one of `allowed` roles.
///
/// - No IO
/// - No panics
pub fn require_role(actor: &Actor, allowed: &[Role]) -> Result<(), AuthzError> {
    if actor.has_any_role(allowed) {
        return Ok(());
    }

    let required = allowed
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    tracing::debug!(actor = %actor.id, role = %actor.role, %required, "role check denied");

    Err(AuthzError::RoleNotAllowed {
        actual: actor.role.to_string(),
        required,
    })
}

/// Require the actor to be exactly `expected` (e.g. the driver assigned to a job).
pub fn require_identity(actor: &Actor, expected: UserId, what: &'static str) -> Result<(), AuthzError> {
    if actor.id == expected {
        Ok(())
    } else {
        Err(AuthzError::IdentityMismatch {
            actual: actor.id,
            what,
        })
    }
}

use thiserror::Error;

use crate::jwt::Claims;
use crate::jwt::TokenCodec;
use crate::jwt::TokenError;
use crate::role::Role;

/// What a protected operation demands of its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Any valid token, whatever its role.
    Authenticated,
    /// A token whose role satisfies the given role.
    Role(Role),
}

impl Requirement {
    pub fn is_met_by(&self, role: Role) -> bool {
        match self {
            Requirement::Authenticated => true,
            Requirement::Role(required) => role.satisfies(*required),
        }
    }
}

/// Access decision failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("Unauthorized: {0}")]
    Unauthorized(TokenError),

    #[error("Forbidden: role {actual} does not satisfy {required:?}")]
    Forbidden {
        actual: Role,
        required: Requirement,
    },
}

/// Validate a bearer token and check it against a requirement.
///
/// - No IO
/// - No shared mutable state
///
/// # Returns
/// The verified claims of the caller
///
/// # Errors
/// * `Unauthorized` - Token is malformed, tampered with, or expired
/// * `Forbidden` - Token is valid but its role is insufficient
pub fn authorize(
    codec: &TokenCodec,
    token: &str,
    requirement: Requirement,
) -> Result<Claims, AccessError> {
    let claims = codec.validate(token).map_err(AccessError::Unauthorized)?;

    if !requirement.is_met_by(claims.role) {
        return Err(AccessError::Forbidden {
            actual: claims.role,
            required: requirement,
        });
    }

    Ok(claims)
}

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::jwt::TokenError;
use crate::role::Role;

/// Claims carried by an access token.
///
/// Every field is required: a token missing any of them fails to decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// Role granted to the subject when the token was issued
    pub role: Role,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims issued at `issued_at` and valid for `ttl`.
    ///
    /// # Errors
    /// * `InvalidLifetime` - `ttl` pushes the expiration out of range
    pub fn new(
        subject: impl ToString,
        role: Role,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, TokenError> {
        let expires_at = issued_at.checked_add_signed(ttl).ok_or_else(|| {
            TokenError::InvalidLifetime(format!("{}s overflows the expiration", ttl.num_seconds()))
        })?;

        Ok(Self {
            sub: subject.to_string(),
            role,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        })
    }

    /// Create claims issued now and valid for `ttl`.
    pub fn for_subject(subject: impl ToString, role: Role, ttl: Duration) -> Result<Self, TokenError> {
        Self::new(subject, role, Utc::now(), ttl)
    }

    /// A token is only valid strictly before its expiration instant.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}

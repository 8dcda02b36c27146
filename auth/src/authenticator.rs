use std::sync::OnceLock;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::access::authorize;
use crate::access::AccessError;
use crate::access::Requirement;
use crate::jwt::Claims;
use crate::jwt::TokenCodec;
use crate::jwt::TokenError;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::role::Role;

/// Authentication coordinator combining password verification and token issuance.
///
/// Holds the process-wide signing key; it is read-only after construction
/// and meant to be shared behind an `Arc`.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
    token_ttl: Duration,
    decoy_hash: OnceLock<String>,
}

/// Result of successful token issuance.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// Signed bearer token
    pub access_token: String,
    /// Instant after which the token is rejected
    pub expires_at: DateTime<Utc>,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
    const DECOY_PASSWORD: &'static str = "decoy-password-for-unknown-subjects";

    /// Create a new authenticator with default hashing cost and a 24 hour token lifetime.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for token signing
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_codec: TokenCodec::new(jwt_secret),
            token_ttl: Duration::hours(Self::DEFAULT_TOKEN_TTL_HOURS),
            decoy_hash: OnceLock::new(),
        }
    }

    /// Replace the password hasher (e.g. to apply a configured cost).
    pub fn with_password_hasher(mut self, password_hasher: PasswordHasher) -> Self {
        self.password_hasher = password_hasher;
        self.decoy_hash = OnceLock::new();
        self
    }

    /// Replace the lifetime of issued tokens.
    pub fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match, or the stored hash is unusable
    pub fn verify_credentials(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<(), AuthenticationError> {
        if self.password_hasher.verify(password, stored_hash) {
            Ok(())
        } else {
            Err(AuthenticationError::InvalidCredentials)
        }
    }

    /// Build the decoy hash with the current hashing cost, if not built yet.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn prepare_decoy_hash(&self) -> Result<(), PasswordError> {
        self.decoy_hash().map(|_| ())
    }

    pub fn has_decoy_hash(&self) -> bool {
        self.decoy_hash.get().is_some()
    }

    fn decoy_hash(&self) -> Result<&str, PasswordError> {
        if let Some(hash) = self.decoy_hash.get() {
            return Ok(hash.as_str());
        }
        let hash = self.password_hasher.hash(Self::DECOY_PASSWORD)?;
        Ok(self.decoy_hash.get_or_init(|| hash).as_str())
    }

    /// Reject a login for a subject that does not exist.
    ///
    /// Runs one verification against the decoy hash first, so the rejection
    /// costs as much as a wrong password for a real account.
    pub fn reject_unknown_subject(&self, password: &str) -> AuthenticationError {
        match self.decoy_hash() {
            Ok(hash) => {
                self.password_hasher.verify(password, hash);
            }
            Err(e) => tracing::error!(error = %e, "Failed to build decoy password hash"),
        }
        AuthenticationError::InvalidCredentials
    }

    /// Issue a token for a subject whose credentials were already verified.
    ///
    /// # Errors
    /// * `TokenError` - Token generation failed, or the lifetime overflows
    pub fn issue_token(
        &self,
        subject: &str,
        role: Role,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let claims = Claims::for_subject(subject, role, self.token_ttl)?;
        let access_token = self.token_codec.encode(&claims)?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now);

        Ok(AuthenticationResult {
            access_token,
            expires_at,
        })
    }

    /// Verify credentials and issue a token in one step.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `TokenError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
        role: Role,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        self.verify_credentials(password, stored_hash)?;
        self.issue_token(subject, role)
    }

    /// Validate and decode a token.
    ///
    /// # Errors
    /// * `TokenError` - Token is malformed, tampered with, or expired
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.token_codec.validate(token)
    }

    /// Validate a token and enforce a role requirement.
    ///
    /// # Errors
    /// * `Unauthorized` - Token failed validation
    /// * `Forbidden` - Role does not satisfy the requirement
    pub fn authorize(&self, token: &str, requirement: Requirement) -> Result<Claims, AccessError> {
        authorize(&self.token_codec, token, requirement)
    }
}

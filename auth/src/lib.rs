//! Authentication utilities library
//!
//! Provides the authentication infrastructure of the employee service:
//! - Password hashing (Argon2id)
//! - Signed bearer token issuance and validation (HS256 JWT)
//! - Role requirements and the access decision applied to every protected call
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{Role, TokenCodec};
//! use chrono::Duration;
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let token = codec.issue("alice", Role::User, Duration::hours(1)).unwrap();
//! let claims = codec.validate(&token).unwrap();
//! assert_eq!(claims.sub, "alice");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Requirement, Role};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let result = auth.authenticate("password123", &hash, "alice", Role::User).unwrap();
//!
//! // Gate a call
//! let claims = auth.authorize(&result.access_token, Requirement::Authenticated).unwrap();
//! assert_eq!(claims.role, Role::User);
//! ```

pub mod access;
pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod role;

// Re-export commonly used items
pub use access::AccessError;
pub use access::Requirement;
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use role::Role;

use async_trait::async_trait;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::LoginResult;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::Username;

/// Port for account domain service operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new account with role `USER`.
    ///
    /// # Arguments
    /// * `command` - Validated username and password
    ///
    /// # Returns
    /// Created account entity
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken, including when a
    ///   concurrent registration won the race
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<Account, AccountError>;

    /// Verify credentials and issue a bearer token.
    ///
    /// # Arguments
    /// * `username` - Raw username as submitted
    /// * `password` - Raw password as submitted
    ///
    /// # Returns
    /// Signed token with the account's current role
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password (indistinguishable)
    /// * `AccountDisabled` - Credentials are valid but the account is disabled
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AccountError>;

    /// Make sure an administrator account exists.
    ///
    /// Creates the account with role `ADMIN` when the username is free and
    /// returns the existing account untouched otherwise.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn ensure_admin(&self, command: RegisterCommand) -> Result<Account, AccountError>;
}

/// Persistence operations for account aggregate.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Persist new account to storage.
    ///
    /// Username uniqueness is enforced here, atomically with the insert.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, account: Account) -> Result<Account, AccountError>;

    /// Retrieve account by username.
    ///
    /// # Returns
    /// Optional account entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<Account>, AccountError>;

    /// Check whether a username is taken.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn exists_by_username(&self, username: &Username) -> Result<bool, AccountError>;
}

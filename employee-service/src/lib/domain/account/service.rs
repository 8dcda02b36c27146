use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Role;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::LoginResult;
use crate::domain::account::models::Password;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::Username;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::AccountServicePort;

/// Domain service implementation for registration and login.
///
/// Concrete implementation of AccountServicePort with dependency injection.
pub struct AccountService<AR>
where
    AR: AccountRepository,
{
    repository: Arc<AR>,
    authenticator: Arc<Authenticator>,
}

impl<AR> AccountService<AR>
where
    AR: AccountRepository,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `authenticator` - Password hashing and token issuance
    pub fn new(repository: Arc<AR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    // Argon2 is CPU bound; keep it off the async workers
    async fn hash_password(&self, password: &Password) -> Result<String, AccountError> {
        let authenticator = Arc::clone(&self.authenticator);
        let password = password.expose().to_string();

        tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
            .await
            .map_err(|e| AccountError::Unknown(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| AccountError::Password(e.to_string()))
    }

    async fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, AccountError> {
        let authenticator = Arc::clone(&self.authenticator);
        let password = password.to_string();
        let stored_hash = stored_hash.to_string();

        tokio::task::spawn_blocking(move || {
            authenticator
                .verify_credentials(&password, &stored_hash)
                .is_ok()
        })
        .await
        .map_err(|e| AccountError::Unknown(format!("Password verification task failed: {}", e)))
    }

    // Costs one Argon2 verification, like a wrong password
    async fn reject_unknown(&self, password: &str) -> AccountError {
        let authenticator = Arc::clone(&self.authenticator);
        let password = password.to_string();

        match tokio::task::spawn_blocking(move || authenticator.reject_unknown_subject(&password))
            .await
        {
            Ok(_) => AccountError::InvalidCredentials,
            Err(e) => AccountError::Unknown(format!("Password verification task failed: {}", e)),
        }
    }

    async fn insert(&self, command: RegisterCommand, role: Role) -> Result<Account, AccountError> {
        let password_hash = self.hash_password(&command.password).await?;

        let account = Account {
            id: AccountId::new(),
            username: command.username,
            password_hash,
            role,
            enabled: true,
        };

        self.repository.create(account).await
    }
}

#[async_trait]
impl<AR> AccountServicePort for AccountService<AR>
where
    AR: AccountRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<Account, AccountError> {
        // Fast path only; the store's unique constraint is authoritative
        if self
            .repository
            .exists_by_username(&command.username)
            .await?
        {
            return Err(AccountError::UsernameAlreadyExists(
                command.username.to_string(),
            ));
        }

        let account = self.insert(command, Role::User).await?;

        tracing::info!(
            account_id = %account.id,
            username = %account.username,
            "Account registered"
        );

        Ok(account)
    }

    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AccountError> {
        let Ok(username) = Username::new(username.to_string()) else {
            return Err(self.reject_unknown(password).await);
        };

        let Some(account) = self.repository.find_by_username(&username).await? else {
            tracing::warn!(username = %username, "Login rejected: unknown username");
            return Err(self.reject_unknown(password).await);
        };

        if !self.verify_password(password, &account.password_hash).await? {
            tracing::warn!(username = %username, "Login rejected: wrong password");
            return Err(AccountError::InvalidCredentials);
        }

        if !account.enabled {
            tracing::warn!(username = %username, "Login rejected: account disabled");
            return Err(AccountError::AccountDisabled);
        }

        let result = self
            .authenticator
            .issue_token(account.username.as_str(), account.role)
            .map_err(|e| AccountError::Token(e.to_string()))?;

        tracing::info!(username = %username, role = %account.role, "Login succeeded");

        Ok(LoginResult {
            token: result.access_token,
            expires_at: result.expires_at,
            username: account.username,
            role: account.role,
        })
    }

    async fn ensure_admin(&self, command: RegisterCommand) -> Result<Account, AccountError> {
        let username = command.username.clone();

        if let Some(existing) = self.repository.find_by_username(&username).await? {
            if existing.role != Role::Admin {
                tracing::warn!(
                    username = %username,
                    role = %existing.role,
                    "Bootstrap admin username belongs to a non-admin account"
                );
            }
            return Ok(existing);
        }

        match self.insert(command, Role::Admin).await {
            Ok(account) => {
                tracing::info!(username = %username, "Bootstrap admin account created");
                Ok(account)
            }
            // Another instance seeded it first
            Err(AccountError::UsernameAlreadyExists(_)) => self
                .repository
                .find_by_username(&username)
                .await?
                .ok_or_else(|| AccountError::Unknown(format!("Account {} vanished", username))),
            Err(e) => Err(e),
        }
    }
}

use async_trait::async_trait;
use auth::Role;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::Username;
use crate::domain::account::ports::AccountRepository;

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_account(row: &PgRow) -> Result<Account, AccountError> {
        let database_error = |e: sqlx::Error| AccountError::DatabaseError(e.to_string());

        let username: String = row.try_get("username").map_err(database_error)?;
        let role: String = row.try_get("role").map_err(database_error)?;

        Ok(Account {
            id: AccountId(row.try_get("id").map_err(database_error)?),
            username: Username::new(username)
                .map_err(|e| AccountError::DatabaseError(format!("Stored username: {}", e)))?,
            password_hash: row.try_get("password_hash").map_err(database_error)?,
            role: role
                .parse::<Role>()
                .map_err(|e| AccountError::DatabaseError(format!("Stored role: {}", e)))?,
            enabled: row.try_get("enabled").map_err(database_error)?,
        })
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, username, password_hash, role, enabled)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(account.id.0)
        .bind(account.username.as_str())
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .bind(account.enabled)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some("accounts_username_key")
                {
                    return AccountError::UsernameAlreadyExists(account.username.to_string());
                }
            }
            AccountError::DatabaseError(e.to_string())
        })?;

        Ok(account)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<Account>, AccountError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash, role, enabled
            FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        row.as_ref().map(Self::row_to_account).transpose()
    }

    async fn exists_by_username(&self, username: &Username) -> Result<bool, AccountError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM accounts WHERE username = $1)")
            .bind(username.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        row.try_get::<bool, _>(0)
            .map_err(|e| AccountError::DatabaseError(e.to_string()))
    }
}

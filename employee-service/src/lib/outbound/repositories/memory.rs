use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::Username;
use crate::domain::account::ports::AccountRepository;
use crate::domain::employee::errors::EmployeeError;
use crate::domain::employee::models::EmailAddress;
use crate::domain::employee::models::Employee;
use crate::domain::employee::models::EmployeeId;
use crate::domain::employee::ports::EmployeeRepository;
use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;

/// Process-local account store keyed by username.
///
/// The uniqueness check and the insert share one write lock, so two racing
/// registrations cannot both succeed.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        let mut accounts = self.accounts.write().await;

        if accounts.contains_key(account.username.as_str()) {
            return Err(AccountError::UsernameAlreadyExists(
                account.username.to_string(),
            ));
        }

        accounts.insert(account.username.to_string(), account.clone());
        Ok(account)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<Account>, AccountError> {
        Ok(self.accounts.read().await.get(username.as_str()).cloned())
    }

    async fn exists_by_username(&self, username: &Username) -> Result<bool, AccountError> {
        Ok(self.accounts.read().await.contains_key(username.as_str()))
    }
}

#[derive(Default)]
struct EmployeeTable {
    rows: HashMap<EmployeeId, Employee>,
    // email -> owner, mirrors the unique index
    emails: HashMap<String, EmployeeId>,
}

/// Process-local employee store with a unique email index.
#[derive(Default)]
pub struct InMemoryEmployeeRepository {
    table: RwLock<EmployeeTable>,
}

impl InMemoryEmployeeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn ordered_page<F>(&self, request: PageRequest, filter: F) -> Page<Employee>
    where
        F: Fn(&Employee) -> bool,
    {
        let table = self.table.read().await;
        let mut matches: Vec<Employee> = table
            .rows
            .values()
            .filter(|employee| filter(*employee))
            .cloned()
            .collect();
        drop(table);

        let sort = request.sort();
        matches.sort_by(|a, b| a.cmp_by(b, sort));
        Page::from_ordered(matches, &request)
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn create(&self, employee: Employee) -> Result<Employee, EmployeeError> {
        let mut table = self.table.write().await;

        if table.emails.contains_key(employee.email.as_str()) {
            return Err(EmployeeError::EmailAlreadyExists(employee.email.to_string()));
        }

        table
            .emails
            .insert(employee.email.to_string(), employee.id);
        table.rows.insert(employee.id, employee.clone());
        Ok(employee)
    }

    async fn find_by_id(&self, id: &EmployeeId) -> Result<Option<Employee>, EmployeeError> {
        Ok(self.table.read().await.rows.get(id).cloned())
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, EmployeeError> {
        Ok(self.table.read().await.emails.contains_key(email.as_str()))
    }

    async fn update(&self, employee: Employee) -> Result<Employee, EmployeeError> {
        let mut table = self.table.write().await;

        let Some(previous_email) = table
            .rows
            .get(&employee.id)
            .map(|existing| existing.email.to_string())
        else {
            return Err(EmployeeError::NotFound(employee.id));
        };

        if let Some(owner) = table.emails.get(employee.email.as_str()) {
            if *owner != employee.id {
                return Err(EmployeeError::EmailAlreadyExists(employee.email.to_string()));
            }
        }

        table.emails.remove(&previous_email);
        table
            .emails
            .insert(employee.email.to_string(), employee.id);
        table.rows.insert(employee.id, employee.clone());
        Ok(employee)
    }

    async fn delete(&self, id: &EmployeeId) -> Result<(), EmployeeError> {
        let mut table = self.table.write().await;

        let removed = table.rows.remove(id).ok_or(EmployeeError::NotFound(*id))?;
        table.emails.remove(removed.email.as_str());
        Ok(())
    }

    async fn find_page(&self, request: PageRequest) -> Result<Page<Employee>, EmployeeError> {
        Ok(self.ordered_page(request, |_| true).await)
    }

    async fn search(
        &self,
        query: &str,
        request: PageRequest,
    ) -> Result<Page<Employee>, EmployeeError> {
        Ok(self
            .ordered_page(request, |employee| employee.matches(query))
            .await)
    }
}

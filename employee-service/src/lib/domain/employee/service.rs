use std::sync::Arc;

use async_trait::async_trait;
use chrono::SubsecRound;
use chrono::Utc;

use crate::domain::employee::errors::EmployeeError;
use crate::domain::employee::models::Employee;
use crate::domain::employee::models::EmployeeId;
use crate::domain::employee::models::EmployeeInput;
use crate::domain::employee::ports::EmployeeRepository;
use crate::domain::employee::ports::EmployeeServicePort;
use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;

/// Domain service implementation for employee operations.
///
/// Concrete implementation of EmployeeServicePort with dependency injection.
/// Role checks happen before a call reaches this service.
pub struct EmployeeService<ER>
where
    ER: EmployeeRepository,
{
    repository: Arc<ER>,
}

impl<ER> EmployeeService<ER>
where
    ER: EmployeeRepository,
{
    /// Create a new employee service.
    ///
    /// # Arguments
    /// * `repository` - Employee persistence implementation
    pub fn new(repository: Arc<ER>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<ER> EmployeeServicePort for EmployeeService<ER>
where
    ER: EmployeeRepository,
{
    async fn list(&self, request: PageRequest) -> Result<Page<Employee>, EmployeeError> {
        self.repository.find_page(request).await
    }

    async fn get(&self, id: &EmployeeId) -> Result<Employee, EmployeeError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(EmployeeError::NotFound(*id))
    }

    async fn create(&self, input: EmployeeInput) -> Result<Employee, EmployeeError> {
        // Fast path only; the store's unique constraint is authoritative
        if self.repository.exists_by_email(&input.email).await? {
            return Err(EmployeeError::EmailAlreadyExists(input.email.to_string()));
        }

        // Microseconds, the precision the store keeps
        let now = Utc::now().trunc_subsecs(6);
        let employee = Employee {
            id: EmployeeId::new(),
            name: input.name,
            email: input.email,
            department: input.department,
            profile_image: None,
            created_at: now,
            updated_at: now,
        };

        let employee = self.repository.create(employee).await?;

        tracing::info!(
            employee_id = %employee.id,
            email = %employee.email,
            "Employee created"
        );

        Ok(employee)
    }

    async fn update(
        &self,
        id: &EmployeeId,
        input: EmployeeInput,
    ) -> Result<Employee, EmployeeError> {
        let existing = self.get(id).await?;

        if existing.email != input.email && self.repository.exists_by_email(&input.email).await? {
            return Err(EmployeeError::EmailAlreadyExists(input.email.to_string()));
        }

        let updated = Employee {
            id: existing.id,
            name: input.name,
            email: input.email,
            department: input.department,
            profile_image: existing.profile_image,
            created_at: existing.created_at,
            updated_at: Utc::now().trunc_subsecs(6).max(existing.updated_at),
        };

        let employee = self.repository.update(updated).await?;

        tracing::info!(employee_id = %employee.id, "Employee updated");

        Ok(employee)
    }

    async fn delete(&self, id: &EmployeeId) -> Result<(), EmployeeError> {
        self.repository.delete(id).await?;

        tracing::info!(employee_id = %id, "Employee deleted");

        Ok(())
    }

    async fn search(
        &self,
        query: &str,
        request: PageRequest,
    ) -> Result<Page<Employee>, EmployeeError> {
        self.repository.search(query, request).await
    }
}

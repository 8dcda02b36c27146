use async_trait::async_trait;

use crate::domain::employee::errors::EmployeeError;
use crate::domain::employee::models::EmailAddress;
use crate::domain::employee::models::Employee;
use crate::domain::employee::models::EmployeeId;
use crate::domain::employee::models::EmployeeInput;
use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;

/// Port for employee domain service operations.
#[async_trait]
pub trait EmployeeServicePort: Send + Sync + 'static {
    /// List one page of employees.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list(&self, request: PageRequest) -> Result<Page<Employee>, EmployeeError>;

    /// Retrieve an employee by ID.
    ///
    /// # Errors
    /// * `NotFound` - No employee with this ID
    /// * `DatabaseError` - Database operation failed
    async fn get(&self, id: &EmployeeId) -> Result<Employee, EmployeeError>;

    /// Create a new employee.
    ///
    /// # Arguments
    /// * `input` - Validated name, email and department
    ///
    /// # Returns
    /// Created employee with both timestamps set to now
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email belongs to another employee
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, input: EmployeeInput) -> Result<Employee, EmployeeError>;

    /// Overwrite the mutable fields of an employee.
    ///
    /// Keeps `created_at` and the profile image, refreshes `updated_at`.
    ///
    /// # Errors
    /// * `NotFound` - No employee with this ID
    /// * `EmailAlreadyExists` - Email belongs to another employee
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, id: &EmployeeId, input: EmployeeInput)
        -> Result<Employee, EmployeeError>;

    /// Delete an employee.
    ///
    /// # Errors
    /// * `NotFound` - No employee with this ID
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &EmployeeId) -> Result<(), EmployeeError>;

    /// Page through employees whose name or email contains `query`,
    /// ignoring case.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn search(
        &self,
        query: &str,
        request: PageRequest,
    ) -> Result<Page<Employee>, EmployeeError>;
}

/// Persistence operations for employee aggregate.
#[async_trait]
pub trait EmployeeRepository: Send + Sync + 'static {
    /// Persist new employee to storage.
    ///
    /// Email uniqueness is enforced here, atomically with the insert.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already taken
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, employee: Employee) -> Result<Employee, EmployeeError>;

    /// Retrieve employee by unique identifier.
    ///
    /// # Returns
    /// Optional employee entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &EmployeeId) -> Result<Option<Employee>, EmployeeError>;

    /// Check whether an email is taken.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, EmployeeError>;

    /// Replace a stored employee, matched by id.
    ///
    /// # Errors
    /// * `NotFound` - No employee with this ID
    /// * `EmailAlreadyExists` - Email belongs to another employee
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, employee: Employee) -> Result<Employee, EmployeeError>;

    /// Remove employee from storage.
    ///
    /// # Errors
    /// * `NotFound` - No employee with this ID
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &EmployeeId) -> Result<(), EmployeeError>;

    /// One page of all employees in the requested order, plus the total count.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_page(&self, request: PageRequest) -> Result<Page<Employee>, EmployeeError>;

    /// One page of employees whose name or email contains `query` (case
    /// insensitive, no wildcards), plus the total match count.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn search(
        &self,
        query: &str,
        request: PageRequest,
    ) -> Result<Page<Employee>, EmployeeError>;
}

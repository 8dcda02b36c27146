use thiserror::Error;

use crate::domain::employee::models::EmployeeId;
use crate::domain::pagination::PageRequestError;
use crate::domain::validation::ValidationErrors;

/// Error for EmployeeId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmployeeIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmployeeName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmployeeNameError {
    #[error("Name is required")]
    Blank,

    #[error("Name too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Email is required")]
    Blank,

    #[error("Invalid email format: {0}")]
    InvalidFormat(String),

    #[error("Email too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DepartmentError {
    #[error("Department too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error for all employee-related operations
#[derive(Debug, Clone, Error)]
pub enum EmployeeError {
    #[error("Invalid employee ID: {0}")]
    InvalidEmployeeId(#[from] EmployeeIdError),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid page request: {0}")]
    InvalidPage(#[from] PageRequestError),

    // Domain-level errors
    #[error("Employee not found: {0}")]
    NotFound(EmployeeId),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for EmployeeError {
    fn from(err: anyhow::Error) -> Self {
        EmployeeError::Unknown(err.to_string())
    }
}

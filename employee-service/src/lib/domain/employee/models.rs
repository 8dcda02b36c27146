use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::employee::errors::DepartmentError;
use crate::domain::employee::errors::EmailError;
use crate::domain::employee::errors::EmployeeIdError;
use crate::domain::employee::errors::EmployeeNameError;
use crate::domain::pagination::Sort;
use crate::domain::pagination::SortDirection;
use crate::domain::pagination::SortField;
use crate::domain::validation::ValidationErrors;

/// Employee aggregate entity.
///
/// `created_at` is fixed when the record is created; `updated_at` moves on
/// every mutation. Both are assigned by the service, never by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: EmployeeName,
    pub email: EmailAddress,
    pub department: Option<Department>,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    /// Total order used for pages: the requested field and direction, then
    /// id ascending. Missing departments sort first ascending, last descending.
    pub fn cmp_by(&self, other: &Self, sort: Sort) -> Ordering {
        let ordering = match sort.field {
            SortField::Id => self.id.cmp(&other.id),
            SortField::Name => self.name.as_str().cmp(other.name.as_str()),
            SortField::Email => self.email.as_str().cmp(other.email.as_str()),
            SortField::Department => self
                .department
                .as_ref()
                .map(Department::as_str)
                .cmp(&other.department.as_ref().map(Department::as_str)),
            SortField::CreatedAt => self.created_at.cmp(&other.created_at),
            SortField::UpdatedAt => self.updated_at.cmp(&other.updated_at),
        };

        let ordering = match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };

        ordering.then_with(|| self.id.cmp(&other.id))
    }

    /// Case-insensitive substring match on name or email.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.as_str().to_lowercase().contains(&query)
            || self.email.as_str().to_lowercase().contains(&query)
    }
}

/// Employee unique identifier type
///
/// UUID v7, so ids sort roughly by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmployeeId(pub Uuid);

impl EmployeeId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parse an employee ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, EmployeeIdError> {
        Uuid::parse_str(s)
            .map(EmployeeId)
            .map_err(|e| EmployeeIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for EmployeeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Employee display name, trimmed, 2-150 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeName(String);

impl EmployeeName {
    const MIN_LENGTH: usize = 2;
    const MAX_LENGTH: usize = 150;

    /// # Errors
    /// * `Blank` - Empty or whitespace only
    /// * `TooShort` - Shorter than 2 characters after trimming
    /// * `TooLong` - Longer than 150 characters after trimming
    pub fn new(name: String) -> Result<Self, EmployeeNameError> {
        let name = name.trim();
        let length = name.chars().count();

        if length == 0 {
            Err(EmployeeNameError::Blank)
        } else if length < Self::MIN_LENGTH {
            Err(EmployeeNameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(EmployeeNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser. Stored trimmed but
/// otherwise exactly as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    const MAX_LENGTH: usize = 150;

    /// # Errors
    /// * `Blank` - Empty or whitespace only
    /// * `TooLong` - Longer than 150 characters
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let email = email.trim();
        let length = email.chars().count();

        if length == 0 {
            return Err(EmailError::Blank);
        }
        if length > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        email_address::EmailAddress::from_str(email)
            .map(|_| EmailAddress(email.to_string()))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department(String);

impl Department {
    const MAX_LENGTH: usize = 100;

    /// Blank input means "no department" and yields `None`.
    ///
    /// # Errors
    /// * `TooLong` - Longer than 100 characters after trimming
    pub fn parse(department: Option<String>) -> Result<Option<Self>, DepartmentError> {
        let Some(department) = department else {
            return Ok(None);
        };

        let department = department.trim();
        let length = department.chars().count();

        if length == 0 {
            Ok(None)
        } else if length > Self::MAX_LENGTH {
            Err(DepartmentError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Some(Self(department.to_string())))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated mutable fields of an employee, shared by create and update.
#[derive(Debug, Clone)]
pub struct EmployeeInput {
    pub name: EmployeeName,
    pub email: EmailAddress,
    pub department: Option<Department>,
}

impl EmployeeInput {
    /// Validate raw employee fields.
    ///
    /// # Errors
    /// Every failing field, as a list of field/reason pairs
    pub fn new(
        name: String,
        email: String,
        department: Option<String>,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = errors.check("name", EmployeeName::new(name));
        let email = errors.check("email", EmailAddress::new(email));
        let department = errors.check("department", Department::parse(department));

        match (name, email, department) {
            (Some(name), Some(email), Some(department)) => Ok(Self {
                name,
                email,
                department,
            }),
            _ => Err(errors),
        }
    }
}

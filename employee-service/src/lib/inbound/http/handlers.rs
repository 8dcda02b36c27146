use auth::AccessError;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::account::errors::AccountError;
use crate::domain::employee::errors::EmployeeError;
use crate::domain::employee::models::Department;
use crate::domain::employee::models::Employee;
use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;
use crate::domain::pagination::PageRequestError;
use crate::domain::pagination::Sort;
use crate::domain::validation::FieldViolation;
use crate::domain::validation::ValidationErrors;

pub mod create_employee;
pub mod delete_employee;
pub mod get_employee;
pub mod list_employees;
pub mod login;
pub mod register;
pub mod search_employees;
pub mod update_employee;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    InvalidFields(ValidationErrors),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
}

impl ApiError {
    /// Log the cause and answer with a message that reveals nothing about it.
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        tracing::error!(error = %cause, "Request failed");
        ApiError::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::internal(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            ApiError::InternalServerError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg, Vec::new())
            }
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg, Vec::new()),
            ApiError::InvalidFields(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation failed".to_string(),
                errors.into_violations(),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, Vec::new()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, Vec::new()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, Vec::new()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, Vec::new()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, Vec::new()),
        };

        (
            status,
            Json(ApiResponseBody::new_error(status, message, errors)),
        )
            .into_response()
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(errors) => ApiError::InvalidFields(errors),
            AccountError::UsernameAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            AccountError::InvalidCredentials | AccountError::AccountDisabled => {
                ApiError::Unauthorized(err.to_string())
            }
            AccountError::Password(_)
            | AccountError::Token(_)
            | AccountError::DatabaseError(_)
            | AccountError::Unknown(_) => ApiError::internal(err),
        }
    }
}

impl From<EmployeeError> for ApiError {
    fn from(err: EmployeeError) -> Self {
        match err {
            EmployeeError::InvalidEmployeeId(_) => ApiError::BadRequest(err.to_string()),
            EmployeeError::Validation(errors) => ApiError::InvalidFields(errors),
            EmployeeError::InvalidPage(_) => ApiError::UnprocessableEntity(err.to_string()),
            EmployeeError::NotFound(_) => ApiError::NotFound(err.to_string()),
            EmployeeError::EmailAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            EmployeeError::DatabaseError(_) | EmployeeError::Unknown(_) => ApiError::internal(err),
        }
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Unauthorized(_) => {
                ApiError::Unauthorized("Invalid or expired token".to_string())
            }
            AccessError::Forbidden { .. } => {
                ApiError::Forbidden("Insufficient role for this operation".to_string())
            }
        }
    }
}

impl From<PageRequestError> for ApiError {
    fn from(err: PageRequestError) -> Self {
        EmployeeError::from(err).into()
    }
}

impl From<QueryRejection> for ApiError {
    fn from(err: QueryRejection) -> Self {
        ApiError::UnprocessableEntity(err.body_text())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(
        status_code: StatusCode,
        message: String,
        errors: Vec<FieldViolation>,
    ) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message, errors },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldViolation>,
}

/// Raw page parameters shared by the listing endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    page: Option<u32>,
    size: Option<u32>,
    sort: Option<String>,
}

impl PageParams {
    pub fn try_into_request(self) -> Result<PageRequest, PageRequestError> {
        let sort = match self.sort {
            Some(sort) if !sort.trim().is_empty() => sort.parse::<Sort>()?,
            _ => Sort::default(),
        };

        PageRequest::new(
            self.page.unwrap_or(0),
            self.size.unwrap_or(PageRequest::DEFAULT_SIZE),
            sort,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeData {
    pub id: String,
    pub name: String,
    pub email: String,
    pub department: Option<String>,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Employee> for EmployeeData {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id.to_string(),
            name: employee.name.as_str().to_string(),
            email: employee.email.as_str().to_string(),
            department: employee
                .department
                .as_ref()
                .map(Department::as_str)
                .map(String::from),
            profile_image: employee.profile_image.clone(),
            created_at: employee.created_at,
            updated_at: employee.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageData<T: Serialize + PartialEq> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl From<Page<Employee>> for PageData<EmployeeData> {
    fn from(page: Page<Employee>) -> Self {
        let total_pages = page.total_pages();
        let page = page.map(|ref employee| EmployeeData::from(employee));
        Self {
            content: page.content,
            page: page.page,
            size: page.size,
            total_elements: page.total_elements,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use auth::Requirement;
    use auth::Role;
    use auth::TokenError;

    use super::*;
    use crate::domain::employee::models::EmployeeId;

    #[test]
    fn test_internal_errors_hide_details() {
        let err = ApiError::from(EmployeeError::DatabaseError(
            "connection refused to 10.0.0.3".to_string(),
        ));
        assert_eq!(
            err,
            ApiError::InternalServerError("Internal server error".to_string())
        );
    }

    #[test]
    fn test_credential_failures_share_one_message() {
        assert_eq!(
            ApiError::from(AccountError::InvalidCredentials),
            ApiError::Unauthorized("Invalid credentials".to_string())
        );
    }

    #[test]
    fn test_access_errors() {
        assert!(matches!(
            ApiError::from(AccessError::Unauthorized(TokenError::Expired)),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from(AccessError::Forbidden {
                actual: Role::User,
                required: Requirement::Role(Role::Admin),
            }),
            ApiError::Forbidden(_)
        ));
    }

    #[test]
    fn test_not_found_names_the_id() {
        let id = EmployeeId::new();
        let ApiError::NotFound(message) = ApiError::from(EmployeeError::NotFound(id)) else {
            panic!("expected NotFound");
        };
        assert!(message.contains(&id.to_string()));
    }

    #[test]
    fn test_page_params_defaults_and_errors() {
        let request = PageParams::default().try_into_request().unwrap();
        assert_eq!(request, PageRequest::default());

        let params = PageParams {
            page: Some(2),
            size: Some(0),
            sort: None,
        };
        assert_eq!(params.try_into_request(), Err(PageRequestError::ZeroSize));

        let params = PageParams {
            page: None,
            size: None,
            sort: Some("salary".to_string()),
        };
        assert!(params.try_into_request().is_err());
    }
}

use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::EmployeeData;
use crate::domain::employee::errors::EmployeeError;
use crate::domain::employee::models::EmployeeInput;
use crate::inbound::http::middleware::AuthenticatedCaller;
use crate::inbound::http::router::AppState;

pub async fn create_employee(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedCaller>,
    Json(body): Json<EmployeeRequest>,
) -> Result<ApiSuccess<EmployeeData>, ApiError> {
    let input = body.try_into_input()?;

    tracing::debug!(
        caller = %caller.username,
        role = %caller.role,
        email = %input.email,
        "Creating employee"
    );

    state
        .employee_service
        .create(input)
        .await
        .map_err(ApiError::from)
        .map(|ref employee| ApiSuccess::new(StatusCode::CREATED, employee.into()))
}

/// HTTP request body for creating or replacing an employee (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmployeeRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    department: Option<String>,
}

impl EmployeeRequest {
    pub fn try_into_input(self) -> Result<EmployeeInput, EmployeeError> {
        EmployeeInput::new(self.name, self.email, self.department).map_err(EmployeeError::from)
    }
}

use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;

use super::create_employee::EmployeeRequest;
use super::ApiError;
use super::ApiSuccess;
use super::EmployeeData;
use crate::domain::employee::errors::EmployeeError;
use crate::domain::employee::models::EmployeeId;
use crate::inbound::http::middleware::AuthenticatedCaller;
use crate::inbound::http::router::AppState;

pub async fn update_employee(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedCaller>,
    Path(id): Path<String>,
    Json(body): Json<EmployeeRequest>,
) -> Result<ApiSuccess<EmployeeData>, ApiError> {
    let employee_id = EmployeeId::from_string(&id).map_err(EmployeeError::from)?;
    let input = body.try_into_input()?;

    tracing::debug!(
        caller = %caller.username,
        role = %caller.role,
        employee_id = %employee_id,
        "Updating employee"
    );

    state
        .employee_service
        .update(&employee_id, input)
        .await
        .map_err(ApiError::from)
        .map(|ref employee| ApiSuccess::new(StatusCode::OK, employee.into()))
}

use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::EmployeeData;
use crate::domain::employee::errors::EmployeeError;
use crate::domain::employee::models::EmployeeId;
use crate::inbound::http::router::AppState;

pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<EmployeeData>, ApiError> {
    let employee_id = EmployeeId::from_string(&id).map_err(EmployeeError::from)?;

    state
        .employee_service
        .get(&employee_id)
        .await
        .map_err(ApiError::from)
        .map(|ref employee| ApiSuccess::new(StatusCode::OK, employee.into()))
}

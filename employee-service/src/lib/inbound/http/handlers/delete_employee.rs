use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::domain::employee::errors::EmployeeError;
use crate::domain::employee::models::EmployeeId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::middleware::AuthenticatedCaller;
use crate::inbound::http::router::AppState;

pub async fn delete_employee(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedCaller>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let employee_id = EmployeeId::from_string(&id).map_err(EmployeeError::from)?;

    tracing::debug!(
        caller = %caller.username,
        role = %caller.role,
        employee_id = %employee_id,
        "Deleting employee"
    );

    state
        .employee_service
        .delete(&employee_id)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}

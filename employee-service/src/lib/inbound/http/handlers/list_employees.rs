use axum::extract::Query;
use axum::extract::State;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::EmployeeData;
use super::PageData;
use super::PageParams;
use crate::inbound::http::router::AppState;

pub async fn list_employees(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<ApiSuccess<PageData<EmployeeData>>, ApiError> {
    let Query(params) = params?;
    let request = params.try_into_request()?;

    state
        .employee_service
        .list(request)
        .await
        .map_err(ApiError::from)
        .map(|page| ApiSuccess::new(StatusCode::OK, page.into()))
}

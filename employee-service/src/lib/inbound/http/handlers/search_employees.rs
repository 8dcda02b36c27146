use axum::extract::Query;
use axum::extract::State;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::EmployeeData;
use super::PageData;
use super::PageParams;
use crate::inbound::http::router::AppState;

pub async fn search_employees(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<ApiSuccess<PageData<EmployeeData>>, ApiError> {
    let Query(params) = params?;
    let request = PageParams {
        page: params.page,
        size: params.size,
        sort: params.sort,
    }
    .try_into_request()?;

    state
        .employee_service
        .search(params.q.as_deref().unwrap_or_default(), request)
        .await
        .map_err(ApiError::from)
        .map(|page| ApiSuccess::new(StatusCode::OK, page.into()))
}

// Flattening PageParams would lose the numeric types in query strings
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
    page: Option<u32>,
    size: Option<u32>,
    sort: Option<String>,
}

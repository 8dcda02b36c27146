use auth::Claims;
use auth::Requirement;
use auth::Role;
use axum::extract::MatchedPath;
use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::http::Method;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type carrying the verified caller into handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedCaller {
    pub username: String,
    pub role: Role,
}

impl From<Claims> for AuthenticatedCaller {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.sub,
            role: claims.role,
        }
    }
}

/// Every protected operation the router exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListEmployees,
    GetEmployee,
    SearchEmployees,
    CreateEmployee,
    UpdateEmployee,
    DeleteEmployee,
}

impl Operation {
    /// Resolve a method and route template to its operation.
    pub fn resolve(method: &Method, route: &str) -> Option<Self> {
        match (method, route) {
            (&Method::GET, "/api/employees") => Some(Operation::ListEmployees),
            (&Method::GET, "/api/employees/search") => Some(Operation::SearchEmployees),
            (&Method::GET, "/api/employees/:id") => Some(Operation::GetEmployee),
            (&Method::POST, "/api/employees") => Some(Operation::CreateEmployee),
            (&Method::PUT, "/api/employees/:id") => Some(Operation::UpdateEmployee),
            (&Method::DELETE, "/api/employees/:id") => Some(Operation::DeleteEmployee),
            _ => None,
        }
    }

    pub fn requirement(&self) -> Requirement {
        match self {
            Operation::ListEmployees | Operation::GetEmployee | Operation::SearchEmployees => {
                Requirement::Authenticated
            }
            Operation::CreateEmployee | Operation::UpdateEmployee | Operation::DeleteEmployee => {
                Requirement::Role(Role::Admin)
            }
        }
    }
}

/// Middleware that validates the bearer token and enforces the role the
/// target operation requires. Routes missing from the operation table are
/// refused.
pub async fn access_gate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req).map_err(IntoResponse::into_response)?;

    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_default();

    let Some(operation) = Operation::resolve(req.method(), &route) else {
        tracing::error!(method = %req.method(), route = %route, "No access rule for route");
        return Err(ApiError::Forbidden("Operation not permitted".to_string()).into_response());
    };

    let claims = state
        .authenticator
        .authorize(token, operation.requirement())
        .map_err(|e| {
            tracing::warn!(operation = ?operation, "Access denied: {}", e);
            ApiError::from(e).into_response()
        })?;

    req.extensions_mut().insert(AuthenticatedCaller::from(claims));

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, ApiError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            ApiError::Unauthorized(
                "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
            )
        })
}

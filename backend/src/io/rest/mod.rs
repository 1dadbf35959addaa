//! # REST API Interface Layer
//!
//! One sub-router per area, nested under `/api` by [`router`]:
//!
//! | Prefix        | Module            |
//! |---------------|-------------------|
//! | `/auth`       | [`auth_apis`]     |
//! | `/dashboard`  | [`dashboard_apis`]|
//! | `/calendar`   | [`calendar_apis`] |
//! | `/turnos`     | [`turno_apis`]    |
//! | `/plantillas` | [`plantilla_apis`]|
//! | `/users`      | [`user_apis`]     |
//! | `/credits`    | [`credit_apis`]   |
//!
//! Every failure is answered with an [`ErrorResponse`] body. Status codes:
//!
//! - no session, bad credentials, upstream 401: `401`
//! - role not allowed: `403`
//! - invalid input: `400`
//! - unknown resource: `404`
//! - Astros API refused, unreachable or answered garbage: `502`
//! - anything else: `500`

pub mod auth_apis;
pub mod calendar_apis;
pub mod credit_apis;
pub mod dashboard_apis;
pub mod mappers;
pub mod plantilla_apis;
pub mod turno_apis;
pub mod user_apis;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use log::{error, warn};
use shared::ErrorResponse;

use crate::domain::ServiceError;
use crate::storage::GatewayError;
use crate::AppState;

/// All gateway routes, relative to `/api`
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_apis::router())
        .route("/dashboard", get(dashboard_apis::get_dashboard))
        .nest("/calendar", calendar_apis::router())
        .nest("/turnos", turno_apis::router())
        .nest("/plantillas", plantilla_apis::router())
        .nest("/users", user_apis::router())
        .nest("/credits", credit_apis::router())
}

pub fn status_for(e: &ServiceError) -> StatusCode {
    match e {
        ServiceError::NotAuthenticated | ServiceError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        ServiceError::Forbidden { .. } => StatusCode::FORBIDDEN,
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Upstream(GatewayError::Unauthorized) => StatusCode::UNAUTHORIZED,
        ServiceError::Upstream(_) => StatusCode::BAD_GATEWAY,
        ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Log a failed operation and turn it into a JSON error response
pub fn error_response(context: &str, e: ServiceError) -> Response {
    let status = status_for(&e);
    let message = match &e {
        // The UI shows this text as is
        ServiceError::Upstream(GatewayError::Rejected { message, .. }) => message.clone(),
        other => other.to_string(),
    };

    if status.is_server_error() {
        error!("{}: {}", context, e);
    } else {
        warn!("{}: {}", context, e);
    }

    (status, Json(ErrorResponse { error: message })).into_response()
}

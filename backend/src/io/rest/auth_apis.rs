//! # REST API for Authentication
//!
//! Login, logout, the current session and account registration. The token
//! itself never leaves the gateway; the UI only sees the user and what it may do.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use log::info;
use shared::{LoginRequest, RegisterRequest, SessionResponse};

use super::error_response;
use crate::domain::commands::auth::LoginCommand;
use crate::domain::session::capabilities;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/session", get(get_session))
        .route("/register", post(register))
}

async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> impl IntoResponse {
    info!("POST /api/auth/login - email: {}", request.email);

    let command = LoginCommand {
        email: request.email,
        password: request.password,
    };
    match state.auth_service.login(command).await {
        Ok(session) => {
            let response = SessionResponse {
                capabilities: capabilities(session.user.role),
                user: session.user,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Login failed", e),
    }
}

async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/auth/logout");
    state.auth_service.logout();
    StatusCode::NO_CONTENT.into_response()
}

async fn get_session(State(state): State<AppState>) -> impl IntoResponse {
    match state.auth_service.current_session() {
        Ok(session) => (StatusCode::OK, Json(session)).into_response(),
        Err(e) => error_response("No session", e),
    }
}

async fn register(State(state): State<AppState>, Json(request): Json<RegisterRequest>) -> impl IntoResponse {
    info!("POST /api/auth/register - username: {}, email: {}", request.username, request.email);

    match state.auth_service.register(request).await {
        Ok(message) => (StatusCode::CREATED, Json(message)).into_response(),
        Err(e) => error_response("Registration failed", e),
    }
}

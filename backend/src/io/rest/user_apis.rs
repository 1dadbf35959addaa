use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::info;
use serde::Deserialize;
use shared::{TipoTurno, UpdateUserRequest};

use super::error_response;
use crate::domain::commands::users::UpdateUserCommand;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UserTurnosQuery {
    pub tipo: TipoTurno,
}

/// Create a router for member administration APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/:id", get(get_user).put(update_user))
        .route("/:id/turnos", get(get_user_turnos))
}

async fn list_users(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/users");

    match state.user_service.list_users().await {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(e) => error_response("Failed to list members", e),
    }
}

async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("GET /api/users/{}", id);

    match state.user_service.get_user(&id).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(e) => error_response("Failed to get member", e),
    }
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> impl IntoResponse {
    info!("PUT /api/users/{} - role: {}, active: {}", id, request.role, request.activo);

    // The path decides which member is edited, whatever the body says
    let command = UpdateUserCommand {
        user_id: id,
        username: request.username,
        first_name: request.first_name,
        last_name: request.last_name,
        role: request.role,
        activo: request.activo,
    };
    match state.user_service.update_user(command).await {
        Ok(message) => (StatusCode::OK, Json(message)).into_response(),
        Err(e) => error_response("Failed to update member", e),
    }
}

async fn get_user_turnos(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<UserTurnosQuery>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/turnos - tipo: {:?}", id, query.tipo);

    match state.turno_service.user_turnos(&id, query.tipo).await {
        Ok(turnos) => (StatusCode::OK, Json(turnos)).into_response(),
        Err(e) => error_response("Failed to list member slots", e),
    }
}

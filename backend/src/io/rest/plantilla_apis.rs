use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use log::info;
use shared::{CreatePlantillaUsuarioRequest, CreateTurnoRequest, WeekForUserRequest};

use super::error_response;
use crate::AppState;

/// Create a router for slot template APIs (staff only)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_template))
        .route("/semana", post(week_for_user))
        .route("/usuario", get(list_user_templates).post(create_user_template))
        .route("/usuario/:id", delete(delete_user_template))
}

async fn create_template(
    State(state): State<AppState>,
    Json(request): Json<CreateTurnoRequest>,
) -> impl IntoResponse {
    info!("POST /api/plantillas - request: {:?}", request);

    match state.plantilla_service.create_template(request).await {
        Ok(message) => (StatusCode::CREATED, Json(message)).into_response(),
        Err(e) => error_response("Failed to create template", e),
    }
}

async fn week_for_user(
    State(state): State<AppState>,
    Json(request): Json<WeekForUserRequest>,
) -> impl IntoResponse {
    info!("POST /api/plantillas/semana - user: {}", request.user_id);

    match state.plantilla_service.week_for_user(&request.user_id).await {
        Ok(turnos) => (StatusCode::OK, Json(turnos)).into_response(),
        Err(e) => error_response("Failed to get week for user", e),
    }
}

async fn list_user_templates(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/plantillas/usuario");

    match state.plantilla_service.list_user_templates().await {
        Ok(templates) => (StatusCode::OK, Json(templates)).into_response(),
        Err(e) => error_response("Failed to list member templates", e),
    }
}

async fn create_user_template(
    State(state): State<AppState>,
    Json(request): Json<CreatePlantillaUsuarioRequest>,
) -> impl IntoResponse {
    info!("POST /api/plantillas/usuario - request: {:?}", request);

    match state.plantilla_service.create_user_template(request).await {
        Ok(message) => (StatusCode::CREATED, Json(message)).into_response(),
        Err(e) => error_response("Failed to create member template", e),
    }
}

async fn delete_user_template(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/plantillas/usuario/{}", id);

    match state.plantilla_service.delete_user_template(&id).await {
        Ok(message) => (StatusCode::OK, Json(message)).into_response(),
        Err(e) => error_response("Failed to delete member template", e),
    }
}

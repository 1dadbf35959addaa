use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use log::info;
use shared::CreateCreditoRequest;

use super::error_response;
use crate::domain::commands::credits::CreateCreditCommand;
use crate::AppState;

/// Create a router for credit APIs.
///
/// `GET /:id` takes a user id, `DELETE /:id` a credit id.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_credit))
        .route("/:id", get(list_credits).delete(delete_credit))
}

async fn list_credits(State(state): State<AppState>, Path(user_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/credits/{}", user_id);

    match state.credit_service.list_credits(&user_id).await {
        Ok(credits) => (StatusCode::OK, Json(credits)).into_response(),
        Err(e) => error_response("Failed to list credits", e),
    }
}

async fn create_credit(
    State(state): State<AppState>,
    Json(request): Json<CreateCreditoRequest>,
) -> impl IntoResponse {
    info!("POST /api/credits - user: {}, expires: {}", request.usuario, request.vence_en);

    let command = CreateCreditCommand {
        user_id: request.usuario,
        expires_on: request.vence_en,
    };
    match state.credit_service.create_credit(command).await {
        Ok(message) => (StatusCode::CREATED, Json(message)).into_response(),
        Err(e) => error_response("Failed to create credit", e),
    }
}

async fn delete_credit(State(state): State<AppState>, Path(credit_id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/credits/{}", credit_id);

    match state.credit_service.delete_credit(&credit_id).await {
        Ok(message) => (StatusCode::OK, Json(message)).into_response(),
        Err(e) => error_response("Failed to delete credit", e),
    }
}

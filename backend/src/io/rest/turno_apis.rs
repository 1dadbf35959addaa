//! # REST API for Slots
//!
//! Dated (monthly) and recurring (weekly) slots, and booking into them.
//! Bookings answer with a [`shared::BookingResponse`] telling whether a credit
//! was spent; a booking that went through is never reported as a failure just
//! because the credit could not be consumed.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use log::info;
use serde::Deserialize;
use shared::{AssignRequest, CreateTurnoRequest, ReleaseRequest};

use super::error_response;
use super::mappers::BookingMapper;
use crate::domain::commands::turnos::{AssignTurnoCommand, ReleaseTurnoCommand};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TurnoListQuery {
    pub dia: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_turnos).post(create_turno))
        .route("/mine", get(my_turnos))
        .route("/semanales", get(list_weekly))
        .route("/semanales/disponibles", get(list_weekly_available))
        .route("/semanales/:id/take", post(take_weekly))
        .route("/semanales/:id/assign", post(assign_weekly))
        .route("/:id", delete(delete_turno))
        .route("/:id/assign", post(assign_turno))
        .route("/:id/release", post(release_turno))
        .route("/:id/jugadores", get(roster))
}

async fn list_turnos(State(state): State<AppState>, Query(query): Query<TurnoListQuery>) -> impl IntoResponse {
    info!("GET /api/turnos - query: {:?}", query);

    match state.turno_service.list_turnos(query.dia.as_deref()).await {
        Ok(turnos) => (StatusCode::OK, Json(turnos)).into_response(),
        Err(e) => error_response("Failed to list slots", e),
    }
}

async fn create_turno(
    State(state): State<AppState>,
    Json(request): Json<CreateTurnoRequest>,
) -> impl IntoResponse {
    info!("POST /api/turnos - request: {:?}", request);

    match state.turno_service.create_turno(request).await {
        Ok(message) => (StatusCode::CREATED, Json(message)).into_response(),
        Err(e) => error_response("Failed to create slot", e),
    }
}

async fn delete_turno(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/turnos/{}", id);

    match state.turno_service.delete_turno(&id).await {
        Ok(message) => (StatusCode::OK, Json(message)).into_response(),
        Err(e) => error_response("Failed to delete slot", e),
    }
}

async fn assign_turno(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AssignRequest>,
) -> impl IntoResponse {
    info!("POST /api/turnos/{}/assign - user: {}", id, request.user_id);

    let command = AssignTurnoCommand {
        turno_id: id,
        user_id: request.user_id,
    };
    match state.turno_service.assign_turno(command).await {
        Ok(result) => (StatusCode::OK, Json(BookingMapper::to_dto(result))).into_response(),
        Err(e) => error_response("Failed to assign slot", e),
    }
}

async fn release_turno(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ReleaseRequest>,
) -> impl IntoResponse {
    info!("POST /api/turnos/{}/release - request: {:?}", id, request);

    let command = ReleaseTurnoCommand {
        turno_id: id,
        user_id: request.user_id,
        tipo: request.tipo,
    };
    match state.turno_service.release_turno(command).await {
        Ok(message) => (StatusCode::OK, Json(message)).into_response(),
        Err(e) => error_response("Failed to release slot", e),
    }
}

async fn my_turnos(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/turnos/mine");

    match state.turno_service.my_turnos().await {
        Ok(turnos) => (StatusCode::OK, Json(turnos)).into_response(),
        Err(e) => error_response("Failed to list own slots", e),
    }
}

async fn list_weekly(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/turnos/semanales");

    match state.turno_service.list_weekly().await {
        Ok(turnos) => (StatusCode::OK, Json(turnos)).into_response(),
        Err(e) => error_response("Failed to list weekly slots", e),
    }
}

async fn list_weekly_available(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/turnos/semanales/disponibles");

    match state.turno_service.list_weekly_available().await {
        Ok(turnos) => (StatusCode::OK, Json(turnos)).into_response(),
        Err(e) => error_response("Failed to list available weekly slots", e),
    }
}

async fn roster(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("GET /api/turnos/{}/jugadores", id);

    match state.turno_service.roster(&id).await {
        Ok(jugadores) => (StatusCode::OK, Json(jugadores)).into_response(),
        Err(e) => error_response("Failed to load slot roster", e),
    }
}

async fn take_weekly(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("POST /api/turnos/semanales/{}/take", id);

    match state.turno_service.take_weekly(&id).await {
        Ok(result) => (StatusCode::OK, Json(BookingMapper::to_dto(result))).into_response(),
        Err(e) => error_response("Failed to take weekly slot", e),
    }
}

async fn assign_weekly(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AssignRequest>,
) -> impl IntoResponse {
    info!("POST /api/turnos/semanales/{}/assign - user: {}", id, request.user_id);

    let command = AssignTurnoCommand {
        turno_id: id,
        user_id: request.user_id,
    };
    match state.turno_service.assign_weekly(command).await {
        Ok(result) => (StatusCode::OK, Json(BookingMapper::to_dto(result))).into_response(),
        Err(e) => error_response("Failed to assign weekly slot", e),
    }
}

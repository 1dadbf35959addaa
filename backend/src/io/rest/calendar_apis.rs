use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::Local;
use log::info;
use serde::Deserialize;

use super::error_response;
use super::mappers::CalendarMapper;
use crate::AppState;

// Query parameters for the calendar month APIs
#[derive(Debug, Deserialize)]
pub struct CalendarMonthQuery {
    pub month: u32,
    pub year: i32,
    /// Only slots the session user holds a seat in
    #[serde(default)]
    pub mine: bool,
}

/// Create a router for calendar related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/month", get(get_calendar_month))
        .route("/month/previous", get(get_previous_month))
        .route("/month/next", get(get_next_month))
        .route("/current-date", get(get_current_date))
}

/// Month grid with the slots plotted on their days
async fn get_calendar_month(
    State(state): State<AppState>,
    Query(query): Query<CalendarMonthQuery>,
) -> impl IntoResponse {
    info!("GET /api/calendar/month - query: {:?}", query);
    month_grid(&state, query.year, query.month, query.mine).await
}

/// Grid of the month before the one in the query
async fn get_previous_month(
    State(state): State<AppState>,
    Query(query): Query<CalendarMonthQuery>,
) -> impl IntoResponse {
    info!("GET /api/calendar/month/previous - query: {:?}", query);
    match state.calendar_service.previous_month(query.month, query.year) {
        Ok((month, year)) => month_grid(&state, year, month, query.mine).await,
        Err(e) => error_response("Invalid calendar month", e),
    }
}

/// Grid of the month after the one in the query
async fn get_next_month(
    State(state): State<AppState>,
    Query(query): Query<CalendarMonthQuery>,
) -> impl IntoResponse {
    info!("GET /api/calendar/month/next - query: {:?}", query);
    match state.calendar_service.next_month(query.month, query.year) {
        Ok((month, year)) => month_grid(&state, year, month, query.mine).await,
        Err(e) => error_response("Invalid calendar month", e),
    }
}

async fn get_current_date(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/calendar/current-date");
    let response = state.calendar_service.current_date(Local::now().date_naive());
    (StatusCode::OK, Json(response)).into_response()
}

async fn month_grid(state: &AppState, year: i32, month: u32, mine: bool) -> Response {
    // Reject a bad month before asking the API for anything
    if let Err(e) = state.calendar_service.target_month(year, month) {
        return error_response("Invalid calendar month", e);
    }

    let batch = match state.turno_service.calendar_records(mine).await {
        Ok(batch) => batch,
        Err(e) => return error_response("Failed to get slots for calendar", e),
    };

    let today = Local::now().date_naive();
    match state
        .calendar_service
        .generate_calendar_grid(year, month, &batch.records, today)
    {
        Ok(grid) => {
            let title = state.calendar_service.title(year, month);
            let response = CalendarMapper::to_grid_dto(&grid, title, &batch.rejected);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Failed to generate calendar", e),
    }
}

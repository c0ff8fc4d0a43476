use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::{
    Booking, BookingError, ExportError, RoomRegistry, RoomSummary, Teacher, TimeSlot, export,
};

#[derive(Clone)]
pub struct AppState {
    registry: RoomRegistry,
}

impl AppState {
    pub fn new(registry: RoomRegistry) -> Self {
        Self { registry }
    }

    fn registry(&self) -> &RoomRegistry {
        &self.registry
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<BookingError> for ApiError {
    fn from(value: BookingError) -> Self {
        match value {
            BookingError::UnknownRoom(_) => ApiError::NotFound(value.to_string()),
            BookingError::Conflict { .. } | BookingError::DuplicateRoom(_) => {
                ApiError::Conflict(value.to_string())
            }
            BookingError::InvalidSlot(_) => ApiError::Invalid(value.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        ApiError::Invalid(value.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        ApiError::Invalid(value.body_text())
    }
}

impl From<ExportError> for ApiError {
    fn from(value: ExportError) -> Self {
        error!(error = %value, "export failed");
        ApiError::Internal(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct CreateRoomPayload {
    name: String,
    #[serde(default)]
    subject: String,
}

/// Slot fields arrive as text so interval errors surface as `invalid_request`.
#[derive(Debug, Deserialize)]
struct BookingPayload {
    date: String,
    day: String,
    start: String,
    end: String,
    teacher: String,
}

impl BookingPayload {
    fn into_booking(self) -> Result<Booking, ApiError> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|e| ApiError::invalid(format!("invalid date '{}': {e}", self.date)))?;
        let time_slot =
            TimeSlot::parse(&self.day, &self.start, &self.end).map_err(BookingError::from)?;
        if self.teacher.trim().is_empty() {
            return Err(ApiError::invalid("teacher name must not be empty"));
        }
        Ok(Booking::new(date, time_slot, Teacher::new(self.teacher.trim())))
    }
}

/// `day` is required: the weekday tag is part of the slot and is never
/// derived from `date`.
#[derive(Debug, Deserialize)]
struct SlotQuery {
    date: NaiveDate,
    day: String,
    start: String,
    end: String,
}

impl SlotQuery {
    fn time_slot(&self) -> Result<TimeSlot, BookingError> {
        Ok(TimeSlot::parse(&self.day, &self.start, &self.end)?)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub room: String,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub available: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FreeRoomsResponse {
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub rooms: Vec<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/rooms", get(list_rooms).post(create_room))
        .route(
            "/rooms/:name/bookings",
            get(list_bookings).post(create_booking),
        )
        .route("/rooms/:name/availability", get(room_availability))
        .route("/rooms/:name/export.csv", get(export_csv))
        .route("/availability", get(free_rooms))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, registry: RoomRegistry) -> std::io::Result<()> {
    let state = AppState::new(registry);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "classroom-booking HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_rooms(State(state): State<AppState>) -> Json<Vec<RoomSummary>> {
    Json(state.registry().summaries())
}

async fn create_room(
    State(state): State<AppState>,
    payload: Result<Json<CreateRoomPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<RoomSummary>), ApiError> {
    let Json(payload) = payload?;
    if payload.name.trim().is_empty() {
        return Err(ApiError::invalid("room name must not be empty"));
    }
    state
        .registry()
        .add_room(payload.name.trim(), payload.subject.clone())?;
    let summary = RoomSummary {
        name: payload.name.trim().to_string(),
        subject: payload.subject,
        booking_count: 0,
    };
    Ok((StatusCode::CREATED, Json(summary)))
}

async fn list_bookings(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    Ok(Json(state.registry().sorted_bookings(&name)?))
}

async fn create_booking(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<BookingPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    let Json(payload) = payload?;
    let booking = payload.into_booking()?;
    state.registry().reserve(&name, booking.clone())?;
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn room_availability(
    State(state): State<AppState>,
    Path(name): Path<String>,
    query: Result<Query<SlotQuery>, QueryRejection>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let Query(query) = query?;
    let time_slot = query.time_slot()?;
    let available = state
        .registry()
        .is_available(&name, query.date, &time_slot)?;
    Ok(Json(AvailabilityResponse {
        room: name,
        date: query.date,
        time_slot,
        available,
    }))
}

async fn free_rooms(
    State(state): State<AppState>,
    query: Result<Query<SlotQuery>, QueryRejection>,
) -> Result<Json<FreeRoomsResponse>, ApiError> {
    let Query(query) = query?;
    let time_slot = query.time_slot()?;
    let rooms = state.registry().available_rooms(query.date, &time_slot);
    Ok(Json(FreeRoomsResponse {
        date: query.date,
        time_slot,
        rooms,
    }))
}

async fn export_csv(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let mut buffer = Vec::new();
    state
        .registry()
        .with_room(&name, |room| export::write_schedule_csv(room, &mut buffer))??;
    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], buffer).into_response())
}

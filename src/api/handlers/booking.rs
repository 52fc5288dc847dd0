//! Booking handlers: create, list, and status update.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};

use crate::api::auth::AuthUser;
use crate::api::dto::{
    BookingDto, CreateBookingRequest, CreateBookingResponse, MessageResponse, StatusQuery,
    UpdateStatusRequest,
};
use crate::app_state::AppState;
use crate::error::{BookingError, ErrorResponse};

/// `POST /agendamentos`: Book a field slot.
///
/// # Errors
///
/// Returns [`BookingError`] on invalid input, a taken slot, or an unknown field.
#[utoipa::path(
    post,
    path = "/api/v1/agendamentos",
    tag = "Bookings",
    summary = "Create a booking",
    description = "Books the slot starting at `horario` (venue-local `YYYY-MM-DDTHH:MM`) on field `campo_id` for the authenticated user.",
    request_body = CreateBookingRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Booking created", body = CreateBookingResponse),
        (status = 400, description = "Malformed body or time", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Unknown field", body = ErrorResponse),
        (status = 409, description = "Slot already booked", body = ErrorResponse),
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    body: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<impl IntoResponse, BookingError> {
    let Json(req) = body?;
    let reservation = state
        .booking_service
        .create_booking(user_id, req.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateBookingResponse {
            message: "Agendamento realizado com sucesso".to_string(),
            id: reservation.id,
        }),
    ))
}

/// `GET /agendamentos`: List the caller's bookings, most recent slot first.
///
/// # Errors
///
/// Returns [`BookingError`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/agendamentos",
    tag = "Bookings",
    summary = "List my bookings",
    description = "Returns every reservation of the authenticated user with field and arena names, ordered by slot time descending. Timestamps carry the venue offset.",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Bookings of the caller", body = Vec<BookingDto>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<BookingDto>>, BookingError> {
    let service = &state.booking_service;
    let views = service.list_bookings(user_id).await?;
    let clock = service.clock();
    Ok(Json(
        views
            .into_iter()
            .map(|v| BookingDto::from_view(v, clock))
            .collect(),
    ))
}

/// `PUT /agendamentos/status?id=<id>`: Change a booking's status.
///
/// Only the player who booked the slot or the owner of the arena may change
/// it.
///
/// # Errors
///
/// Returns [`BookingError`] on a missing id, an unknown status, an unknown
/// reservation, a caller who may not change it, or a disallowed transition.
#[utoipa::path(
    put,
    path = "/api/v1/agendamentos/status",
    tag = "Bookings",
    summary = "Update booking status",
    description = "Moves a reservation to `cancelled` or `completed`. Only `scheduled` reservations can change status, and only the player who booked it or the arena owner may change it.",
    params(StatusQuery),
    request_body = UpdateStatusRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Status updated", body = MessageResponse),
        (status = 400, description = "Missing id or unknown status", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller may not change this reservation", body = ErrorResponse),
        (status = 404, description = "Reservation not found", body = ErrorResponse),
        (status = 409, description = "Transition not allowed", body = ErrorResponse),
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    query: Result<Query<StatusQuery>, QueryRejection>,
    body: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, BookingError> {
    let Query(StatusQuery { id }) = query?;
    let Json(req) = body?;

    state
        .booking_service
        .update_status(user_id, id, &req.status)
        .await?;

    Ok(Json(MessageResponse::new("Status atualizado com sucesso")))
}

/// Booking routes (relative to `/api/v1`).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/agendamentos", get(list_bookings).post(create_booking))
        .route("/agendamentos/status", put(update_status))
}

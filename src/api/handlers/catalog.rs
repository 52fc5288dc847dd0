//! Venue catalog handler.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::ArenaDto;
use crate::app_state::AppState;
use crate::error::{BookingError, ErrorResponse};

/// `GET /arenas`: Public catalog of arenas and their fields.
///
/// # Errors
///
/// Returns [`BookingError`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/arenas",
    tag = "Catalog",
    summary = "List arenas",
    description = "Returns every arena with its fields. Field ids are the `campo_id` values accepted when booking.",
    responses(
        (status = 200, description = "Arena catalog", body = Vec<ArenaDto>),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn list_arenas(
    State(state): State<AppState>,
) -> Result<Json<Vec<ArenaDto>>, BookingError> {
    let arenas = state.booking_service.list_arenas().await?;
    Ok(Json(arenas.into_iter().map(ArenaDto::from).collect()))
}

/// Catalog routes (relative to `/api/v1`).
pub fn routes() -> Router<AppState> {
    Router::new().route("/arenas", get(list_arenas))
}

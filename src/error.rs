//! Booking error types with HTTP status code mapping.
//!
//! [`BookingError`] is the central error type of the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{FieldId, ReservationId, ReservationStatus};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2009,
///     "message": "slot already booked for field 7 at 2025-11-26T23:00:00Z"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see the table on [`BookingError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category            | HTTP Status                  |
/// |-----------|---------------------|------------------------------|
/// | 1000–1099 | Validation          | 400 Bad Request              |
/// | 1401      | Authentication      | 401 Unauthorized             |
/// | 1403      | Authorization       | 403 Forbidden                |
/// | 2000–2099 | State / Not Found   | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server              | 500 Internal Server Error    |
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    /// Request validation failed (malformed body, missing parameter, ...).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The booking time did not match `YYYY-MM-DDTHH:MM` or does not exist
    /// in the venue timezone.
    #[error("invalid time format: {0}")]
    InvalidTimeFormat(String),

    /// The status string is not a known reservation status.
    #[error("invalid status: {0}")]
    InvalidStatus(String),

    /// Missing, malformed, or expired bearer token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The caller neither owns the reservation nor the arena it belongs to.
    #[error("not allowed to change reservation {0}")]
    Forbidden(ReservationId),

    /// No reservation with the given identifier exists.
    #[error("reservation not found: {0}")]
    ReservationNotFound(ReservationId),

    /// The referenced field does not exist.
    #[error("field not found: {0}")]
    FieldNotFound(FieldId),

    /// The slot already holds an active reservation.
    #[error("slot already booked for field {field_id} at {instant}")]
    SlotConflict {
        /// Field of the contested slot.
        field_id: FieldId,
        /// Instant of the contested slot.
        instant: chrono::DateTime<chrono::Utc>,
    },

    /// The requested status change is not in the transition table.
    #[error("cannot change reservation status from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: ReservationStatus,
        /// Requested status.
        to: ReservationStatus,
    },

    /// Storage layer failure.
    #[error("storage failure: {0}")]
    StorageFailure(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BookingError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidTimeFormat(_) => 1002,
            Self::InvalidStatus(_) => 1003,
            Self::Unauthorized(_) => 1401,
            Self::Forbidden(_) => 1403,
            Self::ReservationNotFound(_) => 2001,
            Self::FieldNotFound(_) => 2002,
            Self::SlotConflict { .. } => 2009,
            Self::InvalidTransition { .. } => 2010,
            Self::StorageFailure(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidTimeFormat(_) | Self::InvalidStatus(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::ReservationNotFound(_) | Self::FieldNotFound(_) => StatusCode::NOT_FOUND,
            Self::SlotConflict { .. } | Self::InvalidTransition { .. } => StatusCode::CONFLICT,
            Self::StorageFailure(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client. Server-side failures are replaced by a
    /// generic text; the detail only goes to the log.
    fn public_message(&self) -> String {
        match self {
            Self::StorageFailure(_) | Self::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<sqlx::Error> for BookingError {
    fn from(err: sqlx::Error) -> Self {
        Self::StorageFailure(err.to_string())
    }
}

impl From<JsonRejection> for BookingError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for BookingError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.public_message(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

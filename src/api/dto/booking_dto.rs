//! Booking (agendamento) DTOs.
//!
//! Field names follow the Portuguese wire contract used by the web client.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{BookingView, FieldId, ReservationId, ReservationStatus, UserId, VenueClock};
use crate::service::NewBooking;

/// Request body for `POST /agendamentos`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    /// Field to reserve.
    #[schema(value_type = i64, example = 7)]
    pub campo_id: FieldId,
    /// Local venue time, `YYYY-MM-DDTHH:MM`.
    #[schema(example = "2025-11-26T20:00")]
    pub horario: String,
    /// Number of players.
    #[schema(example = 10)]
    pub jogadores: i32,
    /// Payment method label.
    #[schema(example = "pix")]
    pub pagamento: String,
    /// Whether the booking is already paid.
    pub pago: bool,
}

impl From<CreateBookingRequest> for NewBooking {
    fn from(req: CreateBookingRequest) -> Self {
        Self {
            field_id: req.campo_id,
            raw_time: req.horario,
            player_count: req.jogadores,
            payment_method: req.pagamento,
            paid: req.pago,
        }
    }
}

/// Response body for `POST /agendamentos` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateBookingResponse {
    /// Confirmation text.
    pub message: String,
    /// Identifier of the new reservation.
    #[schema(value_type = i64)]
    pub id: ReservationId,
}

/// One entry of `GET /agendamentos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookingDto {
    /// Reservation id.
    #[schema(value_type = i64)]
    pub id: ReservationId,
    /// Owning user.
    #[schema(value_type = i64)]
    pub id_usuario: UserId,
    /// Reserved field.
    #[schema(value_type = i64)]
    pub id_campo: FieldId,
    /// Slot start, RFC 3339 with the venue offset.
    #[schema(example = "2025-11-26T20:00:00-03:00")]
    pub horario: String,
    /// Number of players.
    pub jogadores: i32,
    /// Payment method label.
    pub pagamento: String,
    /// Paid flag.
    pub pago: bool,
    /// Lifecycle status.
    pub status: ReservationStatus,
    /// Creation time, RFC 3339 with the venue offset.
    pub criado_em: String,
    /// Field display name.
    pub nome_campo: String,
    /// Arena display name.
    pub nome_arena: String,
}

impl BookingDto {
    /// Renders a joined reservation with timestamps in venue time.
    #[must_use]
    pub fn from_view(view: BookingView, clock: &VenueClock) -> Self {
        let r = view.reservation;
        Self {
            id: r.id,
            id_usuario: r.user_id,
            id_campo: r.field_id,
            horario: clock.render(r.instant),
            jogadores: r.player_count,
            pagamento: r.payment_method,
            pago: r.paid,
            status: r.status,
            criado_em: clock.render(r.created_at),
            nome_campo: view.field_name,
            nome_arena: view.arena_name,
        }
    }
}

/// Query string of `PUT /agendamentos/status`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusQuery {
    /// Reservation to update.
    #[param(value_type = i64)]
    pub id: ReservationId,
}

/// Request body for `PUT /agendamentos/status`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// Target status: `scheduled`, `cancelled` or `completed`.
    #[schema(example = "cancelled")]
    pub status: String,
}

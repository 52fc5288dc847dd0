//! Reservation aggregate and its status state machine.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{FieldId, ReservationId, UserId};
use crate::error::BookingError;

/// Lifecycle state of a reservation.
///
/// ```text
///            ┌──────────► cancelled
/// scheduled ─┤
///            └──────────► completed
/// ```
///
/// `scheduled` is the only initial state and the only state with outgoing
/// transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Booked and awaiting play.
    Scheduled,
    /// Released by the player or the venue; frees the slot.
    Cancelled,
    /// Played.
    Completed,
}

impl ReservationStatus {
    /// Wire and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Whether a reservation in this state occupies its slot.
    #[must_use]
    pub const fn holds_slot(self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    /// Whether no further transitions are allowed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Returns `true` if `self → next` is in the transition table.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Scheduled, Self::Cancelled) | (Self::Scheduled, Self::Completed)
        )
    }

    /// Validates `self → next`.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidTransition`] when the pair is not in
    /// the transition table.
    pub fn transition_to(self, next: Self) -> Result<Self, BookingError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(BookingError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scheduled" => Ok(Self::Scheduled),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _ => Err(BookingError::InvalidStatus(s.to_string())),
        }
    }
}

/// A persisted booking of one field at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    /// Storage-assigned identifier.
    pub id: ReservationId,
    /// Owning user (immutable).
    pub user_id: UserId,
    /// Reserved field (immutable).
    pub field_id: FieldId,
    /// Start of the slot, resolved in the venue timezone (immutable).
    pub instant: DateTime<Utc>,
    /// Number of players expected.
    pub player_count: i32,
    /// Free-form payment label (`"pix"`, `"cartao"`, ...).
    pub payment_method: String,
    /// Whether payment has been received.
    pub paid: bool,
    /// Current lifecycle state.
    pub status: ReservationStatus,
    /// Creation timestamp (immutable).
    pub created_at: DateTime<Utc>,
}

/// Validated input for inserting a reservation. Always starts as
/// [`ReservationStatus::Scheduled`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    /// Owning user.
    pub user_id: UserId,
    /// Field to reserve.
    pub field_id: FieldId,
    /// Normalized slot instant.
    pub instant: DateTime<Utc>,
    /// Number of players, strictly positive.
    pub player_count: i32,
    /// Payment label.
    pub payment_method: String,
    /// Paid flag.
    pub paid: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl NewReservation {
    /// Materializes the stored row once the store has assigned an id.
    #[must_use]
    pub fn into_reservation(self, id: ReservationId) -> Reservation {
        Reservation {
            id,
            user_id: self.user_id,
            field_id: self.field_id,
            instant: self.instant,
            player_count: self.player_count,
            payment_method: self.payment_method,
            paid: self.paid,
            status: ReservationStatus::Scheduled,
            created_at: self.created_at,
        }
    }
}

/// A reservation joined with the display names of its field and arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingView {
    /// The reservation itself.
    pub reservation: Reservation,
    /// `campo.nome_campo` of the reserved field.
    pub field_name: String,
    /// `arenas.nome` of the arena owning the field.
    pub arena_name: String,
}

//! Booking service: normalizes times, guards slots, and moves reservations
//! through their lifecycle.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{
    Arena, BookingView, FieldId, NewReservation, Reservation, ReservationId, ReservationStatus,
    UserId, VenueClock,
};
use crate::error::BookingError;
use crate::persistence::BookingStore;

/// Client input for a new booking, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    /// Field to reserve.
    pub field_id: FieldId,
    /// Naive local time, `YYYY-MM-DDTHH:MM`, in the venue timezone.
    pub raw_time: String,
    /// Number of players, must be positive.
    pub player_count: i32,
    /// Payment label.
    pub payment_method: String,
    /// Paid flag.
    pub paid: bool,
}

/// Orchestration layer for every booking operation.
///
/// Stateless coordinator: holds the injected store and the venue clock.
/// The authenticated user is always passed in explicitly.
#[derive(Debug, Clone)]
pub struct BookingService {
    store: Arc<dyn BookingStore>,
    clock: VenueClock,
}

impl BookingService {
    /// Creates a new `BookingService`.
    #[must_use]
    pub fn new(store: Arc<dyn BookingStore>, clock: VenueClock) -> Self {
        Self { store, clock }
    }

    /// Returns the venue clock used for parsing and rendering.
    #[must_use]
    pub const fn clock(&self) -> &VenueClock {
        &self.clock
    }

    /// Returns `true` if the field already holds a non-cancelled
    /// reservation at exactly `instant`.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::StorageFailure`] on backend failure.
    pub async fn is_slot_taken(
        &self,
        field_id: FieldId,
        instant: DateTime<Utc>,
    ) -> Result<bool, BookingError> {
        self.store.slot_taken(field_id, instant).await
    }

    /// Books a slot for `user_id`.
    ///
    /// The availability check gives a fast, clean rejection; the store
    /// re-checks atomically on insert, so a concurrent winner still yields
    /// [`BookingError::SlotConflict`] here.
    ///
    /// # Errors
    ///
    /// - [`BookingError::InvalidRequest`] if `player_count` is not positive.
    /// - [`BookingError::InvalidTimeFormat`] if the time does not normalize.
    /// - [`BookingError::SlotConflict`] if the slot is taken.
    /// - [`BookingError::FieldNotFound`] if the field does not exist.
    /// - [`BookingError::StorageFailure`] on backend failure.
    pub async fn create_booking(
        &self,
        user_id: UserId,
        booking: NewBooking,
    ) -> Result<Reservation, BookingError> {
        if booking.player_count <= 0 {
            return Err(BookingError::InvalidRequest(format!(
                "jogadores must be positive, got {}",
                booking.player_count
            )));
        }

        let instant = self.clock.normalize(&booking.raw_time)?;

        if self.is_slot_taken(booking.field_id, instant).await? {
            tracing::info!(%user_id, field_id = %booking.field_id, %instant, "slot already booked");
            return Err(BookingError::SlotConflict {
                field_id: booking.field_id,
                instant,
            });
        }

        let reservation = self
            .store
            .insert_reservation(NewReservation {
                user_id,
                field_id: booking.field_id,
                instant,
                player_count: booking.player_count,
                payment_method: booking.payment_method,
                paid: booking.paid,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(
            reservation_id = %reservation.id,
            %user_id,
            field_id = %reservation.field_id,
            horario = %self.clock.render(reservation.instant),
            "reservation created"
        );
        Ok(reservation)
    }

    /// Lists a user's reservations, most recent slot first.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::StorageFailure`] on backend failure.
    pub async fn list_bookings(&self, user_id: UserId) -> Result<Vec<BookingView>, BookingError> {
        let views = self.store.list_for_user(user_id).await?;
        tracing::debug!(%user_id, count = views.len(), "reservations listed");
        Ok(views)
    }

    /// Changes a reservation's status on behalf of `actor`, who must be the
    /// player who booked it or the owner of its arena.
    ///
    /// # Errors
    ///
    /// - [`BookingError::InvalidStatus`] if `raw_status` is not a known status.
    /// - [`BookingError::ReservationNotFound`] if the reservation does not exist.
    /// - [`BookingError::Forbidden`] if `actor` may not change it.
    /// - [`BookingError::InvalidTransition`] if the transition is not allowed.
    /// - [`BookingError::StorageFailure`] on backend failure.
    pub async fn update_status(
        &self,
        actor: UserId,
        id: ReservationId,
        raw_status: &str,
    ) -> Result<Reservation, BookingError> {
        let next: ReservationStatus = raw_status.parse()?;
        let reservation = self.store.update_status(actor, id, next).await?;
        tracing::info!(
            reservation_id = %id,
            user_id = %actor,
            status = %next,
            "reservation status changed"
        );
        Ok(reservation)
    }

    /// Lists every arena with its fields.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::StorageFailure`] on backend failure.
    pub async fn list_arenas(&self) -> Result<Vec<Arena>, BookingError> {
        self.store.list_arenas().await
    }
}

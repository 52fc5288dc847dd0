//! Persistence layer: the [`BookingStore`] seam and its implementations.
//!
//! [`postgres::PostgresBookingStore`] is the production backend (`sqlx`).
//! [`memory::InMemoryBookingStore`] keeps everything in process and backs
//! tests and `PERSISTENCE_ENABLED=false` deployments.
//!
//! Both implementations own the slot invariant: at most one reservation
//! with `status <> 'cancelled'` per (field, instant). A lost race on insert
//! surfaces as [`BookingError::SlotConflict`], never as a duplicate row.

pub mod memory;
pub mod models;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    Arena, BookingView, FieldId, NewReservation, Reservation, ReservationId, ReservationStatus,
    UserId,
};
use crate::error::BookingError;

pub use memory::InMemoryBookingStore;
pub use postgres::PostgresBookingStore;

/// Storage operations the booking service depends on.
#[async_trait]
pub trait BookingStore: Send + Sync + fmt::Debug {
    /// Returns `true` if the field holds a non-cancelled reservation at
    /// exactly `instant`.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::StorageFailure`] on backend failure.
    async fn slot_taken(
        &self,
        field_id: FieldId,
        instant: DateTime<Utc>,
    ) -> Result<bool, BookingError>;

    /// Inserts a reservation in `scheduled` state.
    ///
    /// # Errors
    ///
    /// - [`BookingError::SlotConflict`] if the slot is already held.
    /// - [`BookingError::FieldNotFound`] if the field does not exist.
    /// - [`BookingError::StorageFailure`] on backend failure.
    async fn insert_reservation(&self, new: NewReservation) -> Result<Reservation, BookingError>;

    /// Lists a user's reservations joined with field and arena names,
    /// most recent slot first.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::StorageFailure`] on backend failure.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<BookingView>, BookingError>;

    /// Moves a reservation to `next` on behalf of `actor`, validating
    /// ownership and the transition against the current row atomically.
    ///
    /// `actor` must be the reservation's user or the owner of the arena the
    /// field belongs to.
    ///
    /// # Errors
    ///
    /// - [`BookingError::ReservationNotFound`] if no such reservation exists.
    /// - [`BookingError::Forbidden`] if `actor` may not change it.
    /// - [`BookingError::InvalidTransition`] if the transition is not allowed.
    /// - [`BookingError::StorageFailure`] on backend failure.
    async fn update_status(
        &self,
        actor: UserId,
        id: ReservationId,
        next: ReservationStatus,
    ) -> Result<Reservation, BookingError>;

    /// Lists every arena with its fields, ordered by arena id.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::StorageFailure`] on backend failure.
    async fn list_arenas(&self) -> Result<Vec<Arena>, BookingError>;
}

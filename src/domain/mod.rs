//! Domain layer: identifiers, reservations, venue catalog, and venue time.
//!
//! Everything here is storage-agnostic. The reservation status machine and
//! the venue clock are the two pieces of real logic; the rest are plain
//! records.

pub mod catalog;
pub mod ids;
pub mod reservation;
pub mod venue_time;

pub use catalog::{Arena, Field};
pub use ids::{ArenaId, FieldId, ReservationId, UserId};
pub use reservation::{BookingView, NewReservation, Reservation, ReservationStatus};
pub use venue_time::VenueClock;

//! Service layer: business logic orchestration.
//!
//! [`BookingService`] turns client input into validated reservations and
//! delegates storage to an injected [`crate::persistence::BookingStore`].

pub mod booking_service;

pub use booking_service::{BookingService, NewBooking};

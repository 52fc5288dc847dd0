//! # arena-booking
//!
//! REST backend for booking sports-arena fields by time slot.
//!
//! Players pick a field and a venue-local start time; the service
//! normalizes the time to a UTC instant, guarantees at most one active
//! reservation per field and instant, and lets reservations move from
//! `scheduled` to `cancelled` or `completed`.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP + bearer JWT)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── BookingService (service/)
//!     ├── VenueClock (domain/)
//!     │
//!     ├── BookingStore (persistence/)
//!     │     ├── PostgreSQL
//!     │     └── in-memory
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;

//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::api::auth::JwtKeys;
use crate::service::BookingService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Booking service for all business logic.
    pub booking_service: Arc<BookingService>,
    /// Keys used to verify bearer tokens.
    pub jwt: Arc<JwtKeys>,
}

impl AppState {
    /// Bundles the service and token keys.
    #[must_use]
    pub fn new(booking_service: BookingService, jwt: JwtKeys) -> Self {
        Self {
            booking_service: Arc::new(booking_service),
            jwt: Arc::new(jwt),
        }
    }
}

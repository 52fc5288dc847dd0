//! OpenAPI document for the REST API.
//!
//! Served as JSON at `/api-docs/openapi.json`; with the `swagger-ui`
//! feature the same document backs an interactive UI at `/swagger-ui`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::dto::{
    ArenaDto, BookingDto, CreateBookingRequest, CreateBookingResponse, FieldDto, MessageResponse,
    UpdateStatusRequest,
};
use crate::api::handlers::system::HealthResponse;
use crate::domain::ReservationStatus;
use crate::error::{ErrorBody, ErrorResponse};

/// Registers the bearer JWT scheme referenced by the booking endpoints.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("HS256 token carrying `id_usuario`."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document covering every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Arena booking API",
        description = "Booking of sports-arena fields by time slot."
    ),
    paths(
        crate::api::handlers::booking::create_booking,
        crate::api::handlers::booking::list_bookings,
        crate::api::handlers::booking::update_status,
        crate::api::handlers::catalog::list_arenas,
        crate::api::handlers::system::health_handler,
    ),
    components(schemas(
        CreateBookingRequest,
        CreateBookingResponse,
        BookingDto,
        UpdateStatusRequest,
        MessageResponse,
        ArenaDto,
        FieldDto,
        ReservationStatus,
        HealthResponse,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "Bookings", description = "Field reservations of the authenticated user"),
        (name = "Catalog", description = "Arenas and fields"),
        (name = "System", description = "Health probes")
    )
)]
pub struct ApiDoc;

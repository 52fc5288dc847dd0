//! Data Transfer Objects for REST request/response serialization.
//!
//! Wire names are Portuguese to match the existing web client.

pub mod booking_dto;
pub mod catalog_dto;
pub mod common_dto;

pub use booking_dto::*;
pub use catalog_dto::*;
pub use common_dto::*;

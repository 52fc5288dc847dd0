//! Type-safe identifiers for users, fields, arenas, and reservations.
//!
//! Every identifier is a newtype over the `BIGINT` key the storage layer
//! assigns, so a field id cannot be passed where a reservation id is
//! expected.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

macro_rules! storage_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            Serialize, Deserialize, ToSchema, sqlx::Type,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw storage key.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw storage key.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

storage_id!(
    /// Identifier of a registered user (`usuario.id`).
    UserId
);

storage_id!(
    /// Identifier of a bookable field (`campo.id_campo`).
    FieldId
);

storage_id!(
    /// Identifier of an arena (`arenas.id`).
    ArenaId
);

storage_id!(
    /// Identifier of a reservation (`agendamentos.id`). Assigned by storage
    /// on creation and immutable thereafter.
    ReservationId
);

//! Arena and field records as read by the booking service.
//!
//! Arenas and fields are registered by venue owners through a separate
//! surface; here they are read-only.

use super::{ArenaId, FieldId, UserId};

/// A bookable field inside an arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field identifier.
    pub id: FieldId,
    /// Arena owning the field.
    pub arena_id: ArenaId,
    /// Display name.
    pub name: String,
    /// Maximum number of players.
    pub max_players: i32,
    /// Sport played on the field (`"futebol"`, `"volei"`, ...).
    pub modality: String,
    /// Surface or field type (`"society"`, `"areia"`, ...).
    pub field_type: String,
    /// Public image URL.
    pub image_url: String,
}

/// A venue with its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arena {
    /// Arena identifier.
    pub id: ArenaId,
    /// Owning user.
    pub owner_id: UserId,
    /// Display name.
    pub name: String,
    /// Free-form address.
    pub address: String,
    /// Company tax id (CNPJ).
    pub tax_id: String,
    /// Public image URL.
    pub image_url: String,
    /// Fields of this arena, ordered by id.
    pub fields: Vec<Field>,
}

impl Arena {
    /// Looks up one of this arena's fields.
    #[must_use]
    pub fn field(&self, field_id: FieldId) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == field_id)
    }
}

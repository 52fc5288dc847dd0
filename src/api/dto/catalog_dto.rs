//! Venue catalog DTOs for `GET /arenas`.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Arena, ArenaId, Field, FieldId, UserId};

/// A field as shown to players.
#[derive(Debug, Serialize, ToSchema)]
pub struct FieldDto {
    /// Field id (the `campo_id` used when booking).
    #[schema(value_type = i64)]
    pub id_campo: FieldId,
    /// Field name.
    pub nome_campo: String,
    /// Maximum players.
    pub max_jogadores: i32,
    /// Sport.
    pub modalidade: String,
    /// Field type.
    pub tipo_campo: String,
    /// Image URL.
    pub imagem: String,
    /// Owning arena.
    #[schema(value_type = i64)]
    pub id_arena: ArenaId,
    /// Owning arena name.
    pub nome_arena: String,
}

/// An arena with its fields.
#[derive(Debug, Serialize, ToSchema)]
pub struct ArenaDto {
    /// Arena id.
    #[schema(value_type = i64)]
    pub id: ArenaId,
    /// Owning user.
    #[schema(value_type = i64)]
    pub usuario_id: UserId,
    /// Arena name.
    pub nome: String,
    /// Address.
    pub endereco: String,
    /// Tax id.
    pub cnpj: String,
    /// Image URL.
    pub imagem: String,
    /// Number of fields.
    pub qtd_campos: usize,
    /// Fields, ordered by id.
    pub campos: Vec<FieldDto>,
}

impl FieldDto {
    fn new(field: Field, arena_name: &str) -> Self {
        Self {
            id_campo: field.id,
            nome_campo: field.name,
            max_jogadores: field.max_players,
            modalidade: field.modality,
            tipo_campo: field.field_type,
            imagem: field.image_url,
            id_arena: field.arena_id,
            nome_arena: arena_name.to_string(),
        }
    }
}

impl From<Arena> for ArenaDto {
    fn from(arena: Arena) -> Self {
        let campos: Vec<FieldDto> = arena
            .fields
            .into_iter()
            .map(|f| FieldDto::new(f, &arena.name))
            .collect();
        Self {
            id: arena.id,
            usuario_id: arena.owner_id,
            nome: arena.name,
            endereco: arena.address,
            cnpj: arena.tax_id,
            imagem: arena.image_url,
            qtd_campos: campos.len(),
            campos,
        }
    }
}

//! Database row types for reservations and the venue catalog.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::{
    Arena, ArenaId, BookingView, Field, FieldId, Reservation, ReservationId, ReservationStatus,
    UserId,
};
use crate::error::BookingError;

/// A row of the `agendamentos` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReservationRow {
    /// Row id.
    pub id: ReservationId,
    /// Owning user.
    pub id_usuario: UserId,
    /// Reserved field.
    pub id_campo: FieldId,
    /// Slot instant.
    pub horario: DateTime<Utc>,
    /// Player count.
    pub jogadores: i32,
    /// Payment label.
    pub pagamento: String,
    /// Paid flag.
    pub pago: bool,
    /// Status as stored (`TEXT` with a `CHECK` constraint).
    pub status: String,
    /// Creation timestamp.
    pub criado_em: DateTime<Utc>,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = BookingError;

    fn try_from(row: ReservationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: row.id_usuario,
            field_id: row.id_campo,
            instant: row.horario,
            player_count: row.jogadores,
            payment_method: row.pagamento,
            paid: row.pago,
            status: stored_status(&row.status)?,
            created_at: row.criado_em,
        })
    }
}

/// A reservation row joined with `campo.nome_campo` and `arenas.nome`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookingViewRow {
    /// Reservation columns.
    #[sqlx(flatten)]
    pub reservation: ReservationRow,
    /// Field display name.
    pub nome_campo: String,
    /// Arena display name.
    pub nome_arena: String,
}

impl TryFrom<BookingViewRow> for BookingView {
    type Error = BookingError;

    fn try_from(row: BookingViewRow) -> Result<Self, Self::Error> {
        Ok(Self {
            reservation: Reservation::try_from(row.reservation)?,
            field_name: row.nome_campo,
            arena_name: row.nome_arena,
        })
    }
}

/// One row of `arenas LEFT JOIN campo`. Field columns are `NULL` for
/// arenas without fields.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ArenaFieldRow {
    /// Arena id.
    pub id: ArenaId,
    /// Arena owner.
    pub usuario_id: UserId,
    /// Arena name.
    pub nome: String,
    /// Arena address.
    pub endereco: String,
    /// Arena tax id.
    pub cnpj: String,
    /// Arena image URL.
    pub imagem: String,
    /// Field id.
    pub id_campo: Option<FieldId>,
    /// Field name.
    pub nome_campo: Option<String>,
    /// Field capacity.
    pub max_jogadores: Option<i32>,
    /// Field modality.
    pub modalidade: Option<String>,
    /// Field type.
    pub tipo_campo: Option<String>,
    /// Field image URL.
    pub imagem_campo: Option<String>,
}

/// Folds joined rows into arenas, keeping arena id order.
#[must_use]
pub fn group_arenas(rows: Vec<ArenaFieldRow>) -> Vec<Arena> {
    let mut arenas: BTreeMap<ArenaId, Arena> = BTreeMap::new();
    for row in rows {
        let arena = arenas.entry(row.id).or_insert_with(|| Arena {
            id: row.id,
            owner_id: row.usuario_id,
            name: row.nome.clone(),
            address: row.endereco.clone(),
            tax_id: row.cnpj.clone(),
            image_url: row.imagem.clone(),
            fields: Vec::new(),
        });
        if let Some(field_id) = row.id_campo {
            arena.fields.push(Field {
                id: field_id,
                arena_id: row.id,
                name: row.nome_campo.unwrap_or_default(),
                max_players: row.max_jogadores.unwrap_or_default(),
                modality: row.modalidade.unwrap_or_default(),
                field_type: row.tipo_campo.unwrap_or_default(),
                image_url: row.imagem_campo.unwrap_or_default(),
            });
        }
    }
    arenas.into_values().collect()
}

/// Decodes a `status` column value.
pub(crate) fn stored_status(raw: &str) -> Result<ReservationStatus, BookingError> {
    raw.parse()
        .map_err(|_| BookingError::StorageFailure(format!("unexpected stored status {raw:?}")))
}

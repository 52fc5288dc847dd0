//! PostgreSQL implementation of the booking store.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::BookingStore;
use super::models::{ArenaFieldRow, BookingViewRow, ReservationRow, group_arenas, stored_status};
use crate::config::AppConfig;
use crate::domain::{
    Arena, BookingView, FieldId, NewReservation, Reservation, ReservationId, ReservationStatus,
    UserId,
};
use crate::error::BookingError;

/// Partial unique index guarding the slot invariant.
const ACTIVE_SLOT_INDEX: &str = "agendamentos_slot_ativo";
/// Foreign key from `agendamentos.id_campo` to `campo`.
const FIELD_FK: &str = "agendamentos_id_campo_fkey";
/// Foreign key from `agendamentos.id_usuario` to `usuario`.
const USER_FK: &str = "agendamentos_id_usuario_fkey";

const RESERVATION_COLUMNS: &str =
    "id, id_usuario, id_campo, horario, jogadores, pagamento, pago, status, criado_em";

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresBookingStore {
    pool: PgPool,
}

impl PostgresBookingStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::StorageFailure`] if the database cannot be
    /// reached within the configured timeout.
    pub async fn connect(config: &AppConfig) -> Result<Self, BookingError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies the bundled schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::StorageFailure`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), BookingError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| BookingError::StorageFailure(format!("migration failed: {e}")))
    }
}

#[async_trait]
impl BookingStore for PostgresBookingStore {
    async fn slot_taken(
        &self,
        field_id: FieldId,
        instant: DateTime<Utc>,
    ) -> Result<bool, BookingError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
                 SELECT 1 FROM agendamentos \
                 WHERE id_campo = $1 AND horario = $2 AND status <> 'cancelled' \
             )",
        )
        .bind(field_id)
        .bind(instant)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    async fn insert_reservation(&self, new: NewReservation) -> Result<Reservation, BookingError> {
        let (id, created_at) = sqlx::query_as::<_, (ReservationId, DateTime<Utc>)>(
            "INSERT INTO agendamentos \
                 (id_usuario, id_campo, horario, jogadores, pagamento, pago, status, criado_em) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id, criado_em",
        )
        .bind(new.user_id)
        .bind(new.field_id)
        .bind(new.instant)
        .bind(new.player_count)
        .bind(&new.payment_method)
        .bind(new.paid)
        .bind(ReservationStatus::Scheduled.as_str())
        .bind(new.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify_insert_error(e, &new))?;

        // Stored timestamps are truncated to microseconds.
        let mut reservation = new.into_reservation(id);
        reservation.created_at = created_at;
        Ok(reservation)
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<BookingView>, BookingError> {
        let rows = sqlx::query_as::<_, BookingViewRow>(
            "SELECT a.id, a.id_usuario, a.id_campo, a.horario, a.jogadores, a.pagamento, \
                    a.pago, a.status, a.criado_em, c.nome_campo, ar.nome AS nome_arena \
             FROM agendamentos a \
             JOIN campo c ON c.id_campo = a.id_campo \
             JOIN arenas ar ON ar.id = c.id_arena \
             WHERE a.id_usuario = $1 \
             ORDER BY a.horario DESC, a.id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(BookingView::try_from).collect()
    }

    async fn update_status(
        &self,
        actor: UserId,
        id: ReservationId,
        next: ReservationStatus,
    ) -> Result<Reservation, BookingError> {
        let mut tx = self.pool.begin().await?;

        // Row lock so concurrent transitions on the same reservation serialize.
        let (current, booker, arena_owner) = sqlx::query_as::<_, (String, UserId, UserId)>(
            "SELECT a.status, a.id_usuario, ar.usuario_id \
             FROM agendamentos a \
             JOIN campo c ON c.id_campo = a.id_campo \
             JOIN arenas ar ON ar.id = c.id_arena \
             WHERE a.id = $1 \
             FOR UPDATE OF a",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(BookingError::ReservationNotFound(id))?;

        if actor != booker && actor != arena_owner {
            return Err(BookingError::Forbidden(id));
        }
        stored_status(&current)?.transition_to(next)?;

        let row = sqlx::query_as::<_, ReservationRow>(&format!(
            "UPDATE agendamentos SET status = $2 WHERE id = $1 RETURNING {RESERVATION_COLUMNS}"
        ))
        .bind(id)
        .bind(next.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Reservation::try_from(row)
    }

    async fn list_arenas(&self) -> Result<Vec<Arena>, BookingError> {
        let rows = sqlx::query_as::<_, ArenaFieldRow>(
            "SELECT a.id, a.usuario_id, a.nome, a.endereco, a.cnpj, a.imagem, \
                    c.id_campo, c.nome_campo, c.max_jogadores, c.modalidade, c.tipo_campo, \
                    c.imagem AS imagem_campo \
             FROM arenas a \
             LEFT JOIN campo c ON c.id_arena = a.id \
             ORDER BY a.id, c.id_campo",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(group_arenas(rows))
    }
}

/// Translates constraint violations on insert into domain errors.
fn classify_insert_error(err: sqlx::Error, new: &NewReservation) -> BookingError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some(ACTIVE_SLOT_INDEX) {
            return BookingError::SlotConflict {
                field_id: new.field_id,
                instant: new.instant,
            };
        }
        if db_err.is_foreign_key_violation() {
            match db_err.constraint() {
                Some(FIELD_FK) => return BookingError::FieldNotFound(new.field_id),
                Some(USER_FK) => {
                    return BookingError::Unauthorized(format!("unknown user {}", new.user_id));
                }
                _ => {}
            }
        }
    }
    BookingError::from(err)
}

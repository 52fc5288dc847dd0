//! In-process booking store.
//!
//! Reservations live in a `BTreeMap` behind a single [`tokio::sync::RwLock`].
//! The availability check and the insert run under the same write guard, so
//! the slot invariant holds without a database constraint. The venue
//! catalog is fixed at construction.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::BookingStore;
use crate::domain::{
    Arena, ArenaId, BookingView, Field, FieldId, NewReservation, Reservation, ReservationId,
    ReservationStatus, UserId,
};
use crate::error::BookingError;

#[derive(Debug, Default)]
struct Reservations {
    rows: BTreeMap<ReservationId, Reservation>,
    last_id: i64,
}

impl Reservations {
    fn slot_taken(&self, field_id: FieldId, instant: DateTime<Utc>) -> bool {
        self.rows
            .values()
            .any(|r| r.field_id == field_id && r.instant == instant && r.status.holds_slot())
    }
}

/// Booking store kept entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryBookingStore {
    reservations: RwLock<Reservations>,
    arenas: Vec<Arena>,
}

impl InMemoryBookingStore {
    /// Creates a store with an empty catalog. Every booking attempt fails
    /// with [`BookingError::FieldNotFound`] until arenas are provided.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store over a fixed catalog of arenas and fields.
    #[must_use]
    pub fn with_catalog(mut arenas: Vec<Arena>) -> Self {
        arenas.sort_by_key(|a| a.id);
        for arena in &mut arenas {
            arena.fields.sort_by_key(|f| f.id);
        }
        Self {
            reservations: RwLock::new(Reservations::default()),
            arenas,
        }
    }

    /// Creates a store from a JSON catalog seed (see `seed/catalog.example.json`).
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the document does not match the
    /// seed shape.
    pub fn from_catalog_json(json: &str) -> Result<Self, serde_json::Error> {
        let seed: Vec<SeedArena> = serde_json::from_str(json)?;
        Ok(Self::with_catalog(
            seed.into_iter().map(SeedArena::into_arena).collect(),
        ))
    }

    fn lookup_field(&self, field_id: FieldId) -> Option<(&Arena, &Field)> {
        self.arenas
            .iter()
            .find_map(|arena| arena.field(field_id).map(|field| (arena, field)))
    }

    /// Number of stored reservations, cancelled ones included.
    pub async fn len(&self) -> usize {
        self.reservations.read().await.rows.len()
    }

    /// Returns `true` if no reservation has been stored.
    pub async fn is_empty(&self) -> bool {
        self.reservations.read().await.rows.is_empty()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn slot_taken(
        &self,
        field_id: FieldId,
        instant: DateTime<Utc>,
    ) -> Result<bool, BookingError> {
        Ok(self.reservations.read().await.slot_taken(field_id, instant))
    }

    async fn insert_reservation(&self, new: NewReservation) -> Result<Reservation, BookingError> {
        if self.lookup_field(new.field_id).is_none() {
            return Err(BookingError::FieldNotFound(new.field_id));
        }

        let mut guard = self.reservations.write().await;
        if guard.slot_taken(new.field_id, new.instant) {
            return Err(BookingError::SlotConflict {
                field_id: new.field_id,
                instant: new.instant,
            });
        }

        guard.last_id = guard
            .last_id
            .checked_add(1)
            .ok_or_else(|| BookingError::StorageFailure("reservation ids exhausted".to_string()))?;
        let id = ReservationId::new(guard.last_id);
        let reservation = new.into_reservation(id);
        guard.rows.insert(id, reservation.clone());
        Ok(reservation)
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<BookingView>, BookingError> {
        let guard = self.reservations.read().await;
        let mut views: Vec<BookingView> = guard
            .rows
            .values()
            .filter(|r| r.user_id == user_id)
            .filter_map(|r| {
                let (arena, field) = self.lookup_field(r.field_id)?;
                Some(BookingView {
                    reservation: r.clone(),
                    field_name: field.name.clone(),
                    arena_name: arena.name.clone(),
                })
            })
            .collect();
        views.sort_by(|a, b| {
            b.reservation
                .instant
                .cmp(&a.reservation.instant)
                .then(b.reservation.id.cmp(&a.reservation.id))
        });
        Ok(views)
    }

    async fn update_status(
        &self,
        actor: UserId,
        id: ReservationId,
        next: ReservationStatus,
    ) -> Result<Reservation, BookingError> {
        let mut guard = self.reservations.write().await;
        let reservation = guard
            .rows
            .get_mut(&id)
            .ok_or(BookingError::ReservationNotFound(id))?;
        let arena_owner = self
            .lookup_field(reservation.field_id)
            .map(|(arena, _)| arena.owner_id);
        if reservation.user_id != actor && arena_owner != Some(actor) {
            return Err(BookingError::Forbidden(id));
        }
        reservation.status = reservation.status.transition_to(next)?;
        Ok(reservation.clone())
    }

    async fn list_arenas(&self) -> Result<Vec<Arena>, BookingError> {
        Ok(self.arenas.clone())
    }
}

/// Catalog seed document, keyed like the `arenas` table.
#[derive(Debug, Deserialize)]
struct SeedArena {
    id: ArenaId,
    usuario_id: UserId,
    nome: String,
    #[serde(default)]
    endereco: String,
    #[serde(default)]
    cnpj: String,
    #[serde(default)]
    imagem: String,
    #[serde(default)]
    campos: Vec<SeedField>,
}

/// Field entry of a catalog seed, keyed like the `campo` table.
#[derive(Debug, Deserialize)]
struct SeedField {
    id_campo: FieldId,
    nome_campo: String,
    #[serde(default)]
    max_jogadores: i32,
    #[serde(default)]
    modalidade: String,
    #[serde(default)]
    tipo_campo: String,
    #[serde(default)]
    imagem: String,
}

impl SeedArena {
    fn into_arena(self) -> Arena {
        let arena_id = self.id;
        Arena {
            id: arena_id,
            owner_id: self.usuario_id,
            name: self.nome,
            address: self.endereco,
            tax_id: self.cnpj,
            image_url: self.imagem,
            fields: self
                .campos
                .into_iter()
                .map(|f| Field {
                    id: f.id_campo,
                    arena_id,
                    name: f.nome_campo,
                    max_players: f.max_jogadores,
                    modality: f.modalidade,
                    field_type: f.tipo_campo,
                    image_url: f.imagem,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use super::*;

    const SEED: &str = include_str!("../../seed/catalog.example.json");

    fn store() -> InMemoryBookingStore {
        let Ok(store) = InMemoryBookingStore::from_catalog_json(SEED) else {
            panic!("example seed must parse");
        };
        store
    }

    fn slot(hour: u32) -> DateTime<Utc> {
        let Some(t) = chrono::NaiveDate::from_ymd_opt(2025, 11, 26)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
        else {
            panic!("bad fixture");
        };
        t.and_utc()
    }

    fn booking(user: i64, field: i64, instant: DateTime<Utc>) -> NewReservation {
        NewReservation {
            user_id: UserId::new(user),
            field_id: FieldId::new(field),
            instant,
            player_count: 10,
            payment_method: "pix".to_string(),
            paid: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn example_seed_builds_catalog() {
        let store = store();
        let Some((arena, field)) = store.lookup_field(FieldId::new(7)) else {
            panic!("field 7 should be seeded");
        };
        assert_eq!(field.arena_id, arena.id);
        assert!(!arena.name.is_empty());
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = store();
        let Ok(a) = store.insert_reservation(booking(3, 7, slot(20))).await else {
            panic!("first insert failed");
        };
        let Ok(b) = store.insert_reservation(booking(3, 7, slot(21))).await else {
            panic!("second insert failed");
        };
        assert!(a.id < b.id);
        assert_eq!(a.status, ReservationStatus::Scheduled);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn occupied_slot_is_rejected() {
        let store = store();
        assert!(store.insert_reservation(booking(3, 7, slot(20))).await.is_ok());
        let Err(BookingError::SlotConflict { field_id, .. }) =
            store.insert_reservation(booking(4, 7, slot(20))).await
        else {
            panic!("double booking accepted");
        };
        assert_eq!(field_id, FieldId::new(7));
    }

    #[tokio::test]
    async fn unknown_field_is_rejected() {
        let store = store();
        let Err(BookingError::FieldNotFound(id)) =
            store.insert_reservation(booking(3, 999, slot(20))).await
        else {
            panic!("unknown field accepted");
        };
        assert_eq!(id, FieldId::new(999));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn concurrent_inserts_on_one_slot_keep_a_single_winner() {
        let store = Arc::new(store());
        let mut handles = Vec::new();
        for user in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.insert_reservation(booking(user, 7, slot(20))).await
            }));
        }
        let mut winners = 0;
        for handle in handles {
            let Ok(result) = handle.await else {
                panic!("task panicked");
            };
            if result.is_ok() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn update_status_of_missing_reservation_is_not_found() {
        let store = store();
        let Err(BookingError::ReservationNotFound(id)) = store
            .update_status(UserId::new(3), ReservationId::new(5), ReservationStatus::Cancelled)
            .await
        else {
            panic!("missing reservation updated");
        };
        assert_eq!(id, ReservationId::new(5));
    }

    #[tokio::test]
    async fn only_booker_or_arena_owner_changes_status() {
        let store = store();
        let Ok(r) = store.insert_reservation(booking(3, 7, slot(20))).await else {
            panic!("insert failed");
        };

        let Err(BookingError::Forbidden(id)) = store
            .update_status(UserId::new(4), r.id, ReservationStatus::Cancelled)
            .await
        else {
            panic!("stranger changed a reservation");
        };
        assert_eq!(id, r.id);

        // Arena 1 (field 7) is owned by user 1 in the example seed.
        let Ok(done) = store
            .update_status(UserId::new(1), r.id, ReservationStatus::Completed)
            .await
        else {
            panic!("arena owner rejected");
        };
        assert_eq!(done.status, ReservationStatus::Completed);
    }

    #[tokio::test]
    async fn arenas_are_listed_in_id_order() {
        let store = store();
        let Ok(arenas) = store.list_arenas().await else {
            panic!("listing failed");
        };
        assert!(arenas.windows(2).all(|w| matches!(w, [a, b] if a.id < b.id)));
    }
}

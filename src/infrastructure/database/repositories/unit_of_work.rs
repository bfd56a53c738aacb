//! SeaORM unit of work backed by one `DatabaseTransaction`

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, DatabaseTransaction, IsolationLevel,
    TransactionTrait,
};

use super::{booking_repository, db_err, seat_lock_repository, seat_repository, slot_repository};
use crate::domain::booking::{Booking, NewBooking};
use crate::domain::seat::Seat;
use crate::domain::seat_lock::TemporaryLock;
use crate::domain::slot::Slot;
use crate::domain::{DomainResult, UnitOfWork};

/// Dropping the unit of work without `commit` rolls the transaction back.
pub struct SeaOrmUnitOfWork {
    txn: DatabaseTransaction,
}

impl SeaOrmUnitOfWork {
    /// Begin at SERIALIZABLE. SQLite has no per-transaction level; its
    /// single writer gives the same guarantee.
    pub async fn begin(db: &DatabaseConnection) -> DomainResult<Self> {
        let isolation = match db.get_database_backend() {
            DatabaseBackend::Sqlite => None,
            _ => Some(IsolationLevel::Serializable),
        };
        let txn = db
            .begin_with_config(isolation, None)
            .await
            .map_err(db_err)?;
        Ok(Self { txn })
    }
}

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    async fn find_slot(&self, slot_id: i32) -> DomainResult<Option<Slot>> {
        slot_repository::find_slot(&self.txn, slot_id).await
    }

    async fn adjust_available_seats(&self, slot_id: i32, delta: i32) -> DomainResult<()> {
        slot_repository::adjust_available(&self.txn, slot_id, delta).await
    }

    async fn seats_for_update(
        &self,
        slot_id: i32,
        seat_numbers: &[String],
    ) -> DomainResult<Vec<Seat>> {
        seat_repository::find_seats(&self.txn, slot_id, seat_numbers, true).await
    }

    async fn set_seats_booked(&self, seat_ids: &[i32], booked: bool) -> DomainResult<()> {
        seat_repository::set_booked(&self.txn, seat_ids, booked).await
    }

    async fn seats_in_confirmed_bookings(
        &self,
        slot_id: i32,
        seat_numbers: &[String],
    ) -> DomainResult<Vec<String>> {
        seat_repository::confirmed_seat_numbers(&self.txn, slot_id, seat_numbers).await
    }

    async fn insert_booking(&self, booking: NewBooking) -> DomainResult<Booking> {
        booking_repository::insert(&self.txn, booking).await
    }

    async fn find_booking_for_update(&self, booking_id: i32) -> DomainResult<Option<Booking>> {
        booking_repository::find_by_id(&self.txn, booking_id, true).await
    }

    async fn update_booking(&self, booking: &Booking) -> DomainResult<()> {
        booking_repository::update_state(&self.txn, booking).await
    }

    async fn deactivate_expired_locks(&self, now: DateTime<Utc>) -> DomainResult<u64> {
        seat_lock_repository::deactivate_expired(&self.txn, now).await
    }

    async fn release_session_locks(&self, session_id: &str) -> DomainResult<u64> {
        seat_lock_repository::release_by_session(&self.txn, session_id).await
    }

    async fn blocking_locks(
        &self,
        seat_ids: &[i32],
        session_id: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<TemporaryLock>> {
        seat_lock_repository::live_locks(&self.txn, seat_ids, Some(session_id), now).await
    }

    async fn try_insert_lock(&self, lock: &TemporaryLock) -> DomainResult<bool> {
        seat_lock_repository::try_insert(&self.txn, lock).await
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        self.txn.commit().await.map_err(db_err)
    }
}

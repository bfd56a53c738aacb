//! SeaORM implementation of RepositoryProvider

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::domain::booking::BookingRepository;
use crate::domain::repositories::{RepositoryProvider, UnitOfWork};
use crate::domain::seat::SeatRepository;
use crate::domain::seat_lock::SeatLockRepository;
use crate::domain::slot::SlotRepository;
use crate::domain::DomainResult;

use super::booking_repository::SeaOrmBookingRepository;
use super::seat_lock_repository::SeaOrmSeatLockRepository;
use super::seat_repository::SeaOrmSeatRepository;
use super::slot_repository::SeaOrmSlotRepository;
use super::unit_of_work::SeaOrmUnitOfWork;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let seats = repos.seats().find_by_slot(12).await?;
/// let uow = repos.begin().await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    db: DatabaseConnection,
    slots: SeaOrmSlotRepository,
    seats: SeaOrmSeatRepository,
    seat_locks: SeaOrmSeatLockRepository,
    bookings: SeaOrmBookingRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            slots: SeaOrmSlotRepository::new(db.clone()),
            seats: SeaOrmSeatRepository::new(db.clone()),
            seat_locks: SeaOrmSeatLockRepository::new(db.clone()),
            bookings: SeaOrmBookingRepository::new(db.clone()),
            db,
        }
    }
}

#[async_trait]
impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn slots(&self) -> &dyn SlotRepository {
        &self.slots
    }

    fn seats(&self) -> &dyn SeatRepository {
        &self.seats
    }

    fn seat_locks(&self) -> &dyn SeatLockRepository {
        &self.seat_locks
    }

    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }

    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>> {
        Ok(Box::new(SeaOrmUnitOfWork::begin(&self.db).await?))
    }
}

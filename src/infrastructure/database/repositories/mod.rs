//! SeaORM repository implementations
//!
//! Query helpers are generic over `ConnectionTrait` so the plain
//! repositories and the transactional unit of work share one definition.

pub mod booking_repository;
pub mod repository_provider;
pub mod seat_lock_repository;
pub mod seat_repository;
pub mod slot_repository;
pub mod unit_of_work;

pub use booking_repository::SeaOrmBookingRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use seat_lock_repository::SeaOrmSeatLockRepository;
pub use seat_repository::SeaOrmSeatRepository;
pub use slot_repository::SeaOrmSlotRepository;
pub use unit_of_work::SeaOrmUnitOfWork;

use sea_orm::{DbErr, SqlErr};

use crate::domain::DomainError;

fn db_err(e: DbErr) -> DomainError {
    if is_serialization_failure(&e) {
        return DomainError::SeatConflict(Vec::new());
    }
    DomainError::Internal(format!("Database error: {}", e))
}

fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Lost a write race: Postgres serialization failure / deadlock, or SQLite
/// busy after the busy timeout.
fn is_serialization_failure(e: &DbErr) -> bool {
    let msg = e.to_string();
    msg.contains("could not serialize access")
        || msg.contains("deadlock detected")
        || msg.contains("database is locked")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialization_failure_maps_to_conflict() {
        let e = DbErr::Custom("ERROR: could not serialize access due to concurrent update".into());
        assert!(matches!(db_err(e), DomainError::SeatConflict(seats) if seats.is_empty()));
    }

    #[test]
    fn other_errors_map_to_internal() {
        let e = DbErr::Custom("disk I/O error".into());
        assert!(matches!(db_err(e), DomainError::Internal(_)));
    }
}

//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: access to the per-aggregate repositories and
//!   the entry point for transactional work
//! - `UnitOfWork`: operations that must commit or roll back together
//! - `DomainResult`: standard result type for domain operations

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::booking::{Booking, BookingRepository, NewBooking};
use super::seat::{Seat, SeatRepository};
use super::seat_lock::{SeatLockRepository, TemporaryLock};
use super::slot::{Slot, SlotRepository};
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let slot = repos.slots().find_by_id(12).await?;
///     let uow = repos.begin().await?;
///     // ... reads and writes through `uow` ...
///     uow.commit().await?;
/// }
/// ```
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    fn slots(&self) -> &dyn SlotRepository;
    fn seats(&self) -> &dyn SeatRepository;
    fn seat_locks(&self) -> &dyn SeatLockRepository;
    fn bookings(&self) -> &dyn BookingRepository;

    /// Open a serializable transaction. Dropping the returned unit of
    /// work without calling [`UnitOfWork::commit`] rolls it back.
    ///
    /// Callers must not use the plain repositories while a unit of work
    /// is open on a single-connection pool.
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>>;
}

/// Reads and writes bound to one database transaction.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    // ── Inventory ───────────────────────────────────────────────

    async fn find_slot(&self, slot_id: i32) -> DomainResult<Option<Slot>>;

    /// Add `delta` to `available_seats`
    async fn adjust_available_seats(&self, slot_id: i32, delta: i32) -> DomainResult<()>;

    /// Resolve seat numbers with write intent (`SELECT ... FOR UPDATE`
    /// where the backend supports it).
    async fn seats_for_update(
        &self,
        slot_id: i32,
        seat_numbers: &[String],
    ) -> DomainResult<Vec<Seat>>;

    async fn set_seats_booked(&self, seat_ids: &[i32], booked: bool) -> DomainResult<()>;

    /// Numbers among `seat_numbers` referenced by a CONFIRMED booking
    async fn seats_in_confirmed_bookings(
        &self,
        slot_id: i32,
        seat_numbers: &[String],
    ) -> DomainResult<Vec<String>>;

    // ── Bookings ────────────────────────────────────────────────

    async fn insert_booking(&self, booking: NewBooking) -> DomainResult<Booking>;

    async fn find_booking_for_update(&self, booking_id: i32) -> DomainResult<Option<Booking>>;

    /// Persist status, payment status and payment details
    async fn update_booking(&self, booking: &Booking) -> DomainResult<()>;

    // ── Locks ───────────────────────────────────────────────────

    async fn deactivate_expired_locks(&self, now: DateTime<Utc>) -> DomainResult<u64>;

    async fn release_session_locks(&self, session_id: &str) -> DomainResult<u64>;

    /// Active, unexpired locks on the seats held by sessions other than
    /// `session_id`
    async fn blocking_locks(
        &self,
        seat_ids: &[i32],
        session_id: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<TemporaryLock>>;

    /// Insert an active lock. Returns false when the store already holds
    /// an active lock for the seat.
    async fn try_insert_lock(&self, lock: &TemporaryLock) -> DomainResult<bool>;

    async fn commit(self: Box<Self>) -> DomainResult<()>;
}

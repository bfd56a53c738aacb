//! Lock store interface
//!
//! Maintenance queries used outside a unit of work. Acquisition itself runs
//! through [`crate::domain::UnitOfWork`] so the whole batch is atomic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{LockStats, TemporaryLock};
use crate::domain::DomainResult;

#[async_trait]
pub trait SeatLockRepository: Send + Sync {
    /// Active locks owned by the session
    async fn find_by_session(&self, session_id: &str) -> DomainResult<Vec<TemporaryLock>>;

    /// Active, unexpired locks on any of the seats
    async fn find_live_for_seats(
        &self,
        seat_ids: &[i32],
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<TemporaryLock>>;

    /// Set `active = false` on rows with `expires_at <= now`
    async fn deactivate_expired(&self, now: DateTime<Utc>) -> DomainResult<u64>;

    /// Set `active = false` on every lock of the session
    async fn release_by_session(&self, session_id: &str) -> DomainResult<u64>;

    /// Delete rows with `expires_at < cutoff`
    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> DomainResult<u64>;

    /// Delete rows with `locked_at < cutoff`, regardless of expiry
    async fn delete_locked_before(&self, cutoff: DateTime<Utc>) -> DomainResult<u64>;

    /// Delete rows with `active = false`
    async fn delete_inactive(&self) -> DomainResult<u64>;

    async fn stats(&self, now: DateTime<Utc>) -> DomainResult<LockStats>;
}

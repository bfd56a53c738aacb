//! Temporary seat locks
//!
//! `acquire` is all-or-nothing: either every requested seat gets an active
//! lock for the session or none does and the conflicting seat numbers are
//! returned. A session's new selection replaces its previous one.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::domain::seat::Seat;
use crate::domain::seat_lock::{TemporaryLock, DEFAULT_LOCK_DURATION_SECS};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

pub struct LockManager {
    repos: Arc<dyn RepositoryProvider>,
    lock_duration: Duration,
}

impl LockManager {
    pub fn new(repos: Arc<dyn RepositoryProvider>, lock_duration: Duration) -> Self {
        Self {
            repos,
            lock_duration,
        }
    }

    pub fn with_default_duration(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self::new(repos, Duration::seconds(DEFAULT_LOCK_DURATION_SECS))
    }

    pub fn lock_duration(&self) -> Duration {
        self.lock_duration
    }

    /// Lock `seats` for `session_id`. Returns the conflicting seat numbers;
    /// empty means every seat is now held by the session.
    pub async fn acquire(&self, seats: &[Seat], session_id: &str) -> DomainResult<Vec<String>> {
        self.acquire_at(seats, session_id, Utc::now()).await
    }

    pub(crate) async fn acquire_at(
        &self,
        seats: &[Seat],
        session_id: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<String>> {
        if seats.is_empty() {
            return Err(DomainError::Validation("No seats requested".into()));
        }

        let uow = self.repos.begin().await?;

        let expired = uow.deactivate_expired_locks(now).await?;
        let released = uow.release_session_locks(session_id).await?;
        debug!(session_id, expired, released, "Prepared lock store for selection");

        let seat_ids: Vec<i32> = seats.iter().map(|s| s.id).collect();
        let blocking = uow.blocking_locks(&seat_ids, session_id, now).await?;
        if !blocking.is_empty() {
            let conflicts = conflict_numbers(seats, |seat| {
                blocking.iter().any(|l| l.seat_id == seat.id)
            });
            // Expiry and self-release still apply.
            uow.commit().await?;
            record_conflict(session_id, &conflicts);
            return Ok(conflicts);
        }

        // A concurrent session may have inserted between the check and
        // here; the active-seat unique index rejects the second writer.
        // A rejected insert can poison the transaction, so stop at the first
        // one and report it with the seats not yet attempted.
        for (i, seat) in seats.iter().enumerate() {
            let lock = TemporaryLock::new(seat, session_id, now, self.lock_duration);
            if !uow.try_insert_lock(&lock).await? {
                drop(uow);
                let lost: Vec<String> =
                    seats[i..].iter().map(|s| s.seat_number.clone()).collect();
                record_conflict(session_id, &lost);
                return Ok(lost);
            }
        }

        uow.commit().await?;

        metrics::counter!("seat_locks_acquired_total").increment(seats.len() as u64);
        info!(
            session_id,
            seats = ?seats.iter().map(|s| s.seat_number.as_str()).collect::<Vec<_>>(),
            expires_in_secs = self.lock_duration.num_seconds(),
            "Seats locked"
        );
        Ok(Vec::new())
    }

    /// Release every lock of the session. Returns how many were active.
    pub async fn release(&self, session_id: &str) -> DomainResult<u64> {
        let released = self.repos.seat_locks().release_by_session(session_id).await?;
        debug!(session_id, released, "Released session locks");
        Ok(released)
    }

    /// Whether an active, unexpired lock of another session covers the seat
    pub async fn is_held_by_other(&self, seat: &Seat, session_id: &str) -> DomainResult<bool> {
        let now = Utc::now();
        let locks = self
            .repos
            .seat_locks()
            .find_live_for_seats(&[seat.id], now)
            .await?;
        Ok(locks.iter().any(|l| l.blocks(session_id, now)))
    }

    /// Seats among `seats` held by sessions other than `session_id`
    pub async fn held_by_others(
        &self,
        seats: &[Seat],
        session_id: Option<&str>,
    ) -> DomainResult<Vec<i32>> {
        let now = Utc::now();
        let ids: Vec<i32> = seats.iter().map(|s| s.id).collect();
        let locks = self.repos.seat_locks().find_live_for_seats(&ids, now).await?;
        Ok(locks
            .into_iter()
            .filter(|l| session_id.map_or(true, |s| l.blocks(s, now)))
            .map(|l| l.seat_id)
            .collect())
    }

    pub async fn locks_for_session(&self, session_id: &str) -> DomainResult<Vec<TemporaryLock>> {
        self.repos.seat_locks().find_by_session(session_id).await
    }
}

fn conflict_numbers(seats: &[Seat], is_blocked: impl Fn(&Seat) -> bool) -> Vec<String> {
    seats
        .iter()
        .filter(|s| is_blocked(s))
        .map(|s| s.seat_number.clone())
        .collect()
}

fn record_conflict(session_id: &str, conflicts: &[String]) {
    metrics::counter!("seat_lock_conflicts_total").increment(1);
    info!(session_id, conflicts = ?conflicts, "Seat lock conflict");
}

/// Session id for callers that did not send one: derived from the user id
/// when known, random otherwise.
pub fn generate_session_id(user_id: Option<&str>) -> String {
    match user_id.map(str::trim).filter(|u| !u.is_empty()) {
        Some(user) => {
            let digest = Sha256::digest(user.as_bytes());
            format!("user_{}", &hex::encode(digest)[..16])
        }
        None => {
            let suffix: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(8)
                .map(char::from)
                .collect();
            format!("session_{}", suffix)
        }
    }
}

//! Temporary lock domain entity

use chrono::{DateTime, Duration, Utc};

use crate::domain::seat::Seat;

/// Holds last three minutes unless configured otherwise.
pub const DEFAULT_LOCK_DURATION_SECS: i64 = 180;

/// A time-bounded claim of one seat by one session.
///
/// At most one lock per seat is active and unexpired at any instant; the
/// store enforces one active row per seat.
#[derive(Debug, Clone, PartialEq)]
pub struct TemporaryLock {
    /// Zero until persisted
    pub id: i32,
    pub seat_id: i32,
    pub slot_id: i32,
    pub seat_number: String,
    pub session_id: String,
    pub locked_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub active: bool,
}

impl TemporaryLock {
    pub fn new(seat: &Seat, session_id: &str, now: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            id: 0,
            seat_id: seat.id,
            slot_id: seat.slot_id,
            seat_number: seat.seat_number.clone(),
            session_id: session_id.to_string(),
            locked_at: now,
            expires_at: now + duration,
            active: true,
        }
    }

    /// Active and not yet past `expires_at`
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.active && self.expires_at > now
    }

    pub fn blocks(&self, session_id: &str, now: DateTime<Utc>) -> bool {
        self.is_live(now) && self.session_id != session_id
    }
}

/// Lock store occupancy, used by the cleanup status endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockStats {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    /// Active rows whose `expires_at` has passed
    pub expired: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat() -> Seat {
        Seat {
            id: 7,
            slot_id: 3,
            seat_number: "C4".into(),
            price: 120.0,
            booked: false,
        }
    }

    #[test]
    fn new_lock_expires_after_duration() {
        let now = Utc::now();
        let lock = TemporaryLock::new(&seat(), "session_x", now, Duration::seconds(180));
        assert_eq!(lock.expires_at - lock.locked_at, Duration::minutes(3));
        assert_eq!(lock.seat_number, "C4");
        assert_eq!(lock.slot_id, 3);
        assert!(lock.is_live(now));
    }

    #[test]
    fn expired_lock_blocks_nobody() {
        let now = Utc::now();
        let lock = TemporaryLock::new(&seat(), "a", now - Duration::minutes(5), Duration::minutes(3));
        assert!(!lock.is_live(now));
        assert!(!lock.blocks("b", now));
    }

    #[test]
    fn own_lock_does_not_block() {
        let now = Utc::now();
        let lock = TemporaryLock::new(&seat(), "a", now, Duration::minutes(3));
        assert!(!lock.blocks("a", now));
        assert!(lock.blocks("b", now));
    }
}

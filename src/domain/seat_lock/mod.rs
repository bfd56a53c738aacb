//! Temporary seat lock aggregate
//!
//! Session-owned soft holds taken while a user picks seats. A hold never
//! constitutes a booking; the committer re-validates durable seat state.

pub mod model;
pub mod repository;

pub use model::{LockStats, TemporaryLock, DEFAULT_LOCK_DURATION_SECS};
pub use repository::SeatLockRepository;

//! Seat locking and booking use cases

pub mod cache_reaper;
pub mod committer;
pub mod lock_manager;
pub mod lock_reaper;
pub mod selection;
pub mod selection_cache;
pub mod verification;

pub use cache_reaper::start_cache_reaper;
pub use committer::{
    BookingCommitter, BookingOverride, CommitRequest, CommitStage, DEFAULT_AMOUNT_TOLERANCE,
};
pub use lock_manager::{generate_session_id, LockManager};
pub use lock_reaper::{LockReaper, ReapCapability};
pub use selection::{SeatPrice, SeatSelectionService, Selection, SelectionSnapshot};
pub use selection_cache::{SelectionCache, SelectionKey, TtlCache, DEFAULT_SELECTION_TTL};
pub use verification::{RepositoryTicketVerifier, TicketVerifier};

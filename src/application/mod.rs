pub mod booking;

// Re-export key types for convenience
pub use booking::{
    generate_session_id, start_cache_reaper, BookingCommitter, CommitRequest, LockManager,
    LockReaper, ReapCapability, RepositoryTicketVerifier, SeatSelectionService, Selection,
    SelectionCache, SelectionSnapshot, TicketVerifier,
};

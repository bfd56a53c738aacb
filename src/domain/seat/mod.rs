//! Seat aggregate

pub mod model;
pub mod repository;

pub use model::{missing_numbers, total_price, Seat};
pub use repository::SeatRepository;

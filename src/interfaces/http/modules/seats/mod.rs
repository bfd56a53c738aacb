//! Seat availability, selection and release

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;

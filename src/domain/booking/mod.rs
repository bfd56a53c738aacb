//! Booking aggregate
//!
//! Contains the Booking entity, its status types, ticket verification data
//! and the repository interface.

pub mod model;
pub mod repository;

pub use model::{Booking, BookingStatus, NewBooking, PaymentStatus, TicketVerification};
pub use repository::BookingRepository;

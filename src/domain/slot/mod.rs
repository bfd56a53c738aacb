//! Slot aggregate
//!
//! A scheduled showing with a fixed seat inventory. Slots are owned by the
//! catalog; this service reads them and maintains `available_seats`.

pub mod model;
pub mod repository;

pub use model::{NewSlot, Slot};
pub use repository::SlotRepository;

//! Database entities module

pub mod booking;
pub mod booking_seat;
pub mod movie_slot;
pub mod seat;
pub mod temporary_seat_lock;

pub use booking::Entity as Booking;
pub use booking_seat::Entity as BookingSeat;
pub use movie_slot::Entity as MovieSlot;
pub use seat::Entity as Seat;
pub use temporary_seat_lock::Entity as TemporarySeatLock;

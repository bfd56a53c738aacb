//! Domain layer: aggregates, repository interfaces and collaborator ports.

pub mod booking;
pub mod payment;
pub mod repositories;
pub mod seat;
pub mod seat_lock;
pub mod slot;

pub use booking::{Booking, BookingRepository, BookingStatus, NewBooking, PaymentStatus, TicketVerification};
pub use payment::{CardDetails, GatewayStatus, PaymentGateway, PaymentReceipt, RefundReceipt};
pub use repositories::{DomainResult, RepositoryProvider, UnitOfWork};
pub use seat::{Seat, SeatRepository};
pub use seat_lock::{LockStats, SeatLockRepository, TemporaryLock};
pub use slot::{NewSlot, Slot, SlotRepository};

pub use crate::shared::errors::DomainError;

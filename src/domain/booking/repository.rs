//! Booking repository interface

use async_trait::async_trait;

use super::model::{Booking, TicketVerification};
use crate::domain::DomainResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>>;

    /// Every booking, newest first
    async fn find_all(&self) -> DomainResult<Vec<Booking>>;

    /// Bookings of a user, newest first
    async fn find_by_user(&self, user_email: &str) -> DomainResult<Vec<Booking>>;

    /// Bookings of a slot, newest first
    async fn find_by_slot(&self, slot_id: i32) -> DomainResult<Vec<Booking>>;

    /// Store verification data unless the booking already has some.
    /// Returns false when the booking was already provisioned.
    async fn attach_verification(
        &self,
        booking_id: i32,
        verification: &TicketVerification,
    ) -> DomainResult<bool>;
}

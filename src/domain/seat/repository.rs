//! Seat repository interface

use async_trait::async_trait;

use super::model::Seat;
use crate::domain::DomainResult;

#[async_trait]
pub trait SeatRepository: Send + Sync {
    /// All seats of a slot ordered by seat number
    async fn find_by_slot(&self, slot_id: i32) -> DomainResult<Vec<Seat>>;

    /// Seats of a slot matching the given numbers. Unknown numbers are
    /// simply absent from the result.
    async fn find_by_numbers(&self, slot_id: i32, seat_numbers: &[String])
        -> DomainResult<Vec<Seat>>;

    /// Whether the seat is referenced by a CONFIRMED booking of the slot
    async fn is_in_confirmed_booking(&self, slot_id: i32, seat_number: &str)
        -> DomainResult<bool>;
}

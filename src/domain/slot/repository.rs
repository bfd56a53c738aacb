//! Slot repository interface

use async_trait::async_trait;

use super::model::{NewSlot, Slot};
use crate::domain::DomainResult;

#[async_trait]
pub trait SlotRepository: Send + Sync {
    /// Find a slot by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Slot>>;

    /// Create a slot together with its seats `(seat_number, price)`.
    /// `total_seats` and `available_seats` are set to the seat count.
    async fn create_with_seats(
        &self,
        slot: NewSlot,
        seats: Vec<(String, f64)>,
    ) -> DomainResult<Slot>;
}

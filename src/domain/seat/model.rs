//! Seat domain entity

/// A bookable seat of a slot.
///
/// `booked` flips false→true only inside a booking commit and back only
/// through cancellation.
#[derive(Debug, Clone, PartialEq)]
pub struct Seat {
    pub id: i32,
    pub slot_id: i32,
    /// Unique within the slot, e.g. "A1"
    pub seat_number: String,
    pub price: f64,
    pub booked: bool,
}

/// Sum of seat prices
pub fn total_price(seats: &[Seat]) -> f64 {
    seats.iter().map(|s| s.price).sum()
}

/// Requested seat numbers absent from `found`, in request order.
pub fn missing_numbers(requested: &[String], found: &[Seat]) -> Vec<String> {
    requested
        .iter()
        .filter(|n| !found.iter().any(|s| &s.seat_number == *n))
        .cloned()
        .collect()
}

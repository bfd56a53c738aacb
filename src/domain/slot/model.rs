//! Slot domain entity

use chrono::{NaiveDate, NaiveTime};

/// A showing of a movie at a theater.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub id: i32,
    pub movie_title: String,
    pub show_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub theater_name: String,
    pub screen_type: String,
    pub total_seats: i32,
    /// `total_seats` minus seats held by non-cancelled bookings
    pub available_seats: i32,
}

/// Slot data supplied by the catalog when a showing is created.
#[derive(Debug, Clone)]
pub struct NewSlot {
    pub movie_title: String,
    pub show_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub theater_name: String,
    pub screen_type: String,
}

//! Seat selection DTOs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::booking::SelectionSnapshot;

/// Body of `check-availability` and `select-seats`
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeatSelectionRequest {
    #[validate(range(min = 1, message = "slotId is required"))]
    pub slot_id: i32,
    #[validate(length(min = 1, message = "at least one seat is required"))]
    pub seat_numbers: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub slot_id: i32,
    /// Seat number → available
    pub seat_availability: BTreeMap<String, bool>,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeatDetailDto {
    pub seat_number: String,
    pub price: f64,
}

/// Priced snapshot of a successful selection
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResponse {
    pub slot_id: i32,
    pub seat_numbers: Vec<String>,
    pub total_amount: f64,
    pub seat_details: Vec<SeatDetailDto>,
    pub movie_title: String,
    /// `YYYY-MM-DD`
    pub show_date: String,
    /// `HH:MM`
    pub start_time: String,
    pub theater_name: String,
    pub screen_type: String,
    pub session_id: String,
    /// RFC 3339
    pub lock_expires_at: String,
    pub lock_duration_seconds: i64,
}

impl SelectionResponse {
    pub fn from_snapshot(s: SelectionSnapshot, lock_duration_seconds: i64) -> Self {
        Self {
            slot_id: s.slot_id,
            seat_numbers: s.seat_numbers,
            total_amount: s.total_amount,
            seat_details: s
                .seat_details
                .into_iter()
                .map(|d| SeatDetailDto {
                    seat_number: d.seat_number,
                    price: d.price,
                })
                .collect(),
            movie_title: s.movie_title,
            show_date: s.show_date.format("%Y-%m-%d").to_string(),
            start_time: s.start_time.format("%H:%M").to_string(),
            theater_name: s.theater_name,
            screen_type: s.screen_type,
            session_id: s.session_id,
            lock_expires_at: s.lock_expires_at.to_rfc3339(),
            lock_duration_seconds,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseResponse {
    pub message: String,
    pub session_id: String,
    pub released_count: u64,
}

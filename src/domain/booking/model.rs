//! Booking domain entity

use chrono::{DateTime, Utc};

/// Booking status. Bookings are created CONFIRMED; there is no pending state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "CONFIRMED" => Self::Confirmed,
            _ => Self::Cancelled,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment status recorded on the booking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Completed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "COMPLETED",
            Self::Refunded => "REFUNDED",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "REFUNDED" => Self::Refunded,
            _ => Self::Completed,
        }
    }
}

/// Data printed on the ticket and checked at the door
#[derive(Debug, Clone, PartialEq)]
pub struct TicketVerification {
    pub verification_token: String,
    pub random_string: String,
    /// `token:random`
    pub qr_code: String,
    pub is_verified: bool,
    pub verification_time: Option<DateTime<Utc>>,
    pub verified_by: Option<String>,
}

/// A confirmed (or later cancelled) purchase of seats of one slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: i32,
    pub slot_id: i32,
    pub user_email: String,
    /// In request order
    pub seat_numbers: Vec<String>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_id: Option<String>,
    pub payment_method: String,
    pub payment_details: serde_json::Value,
    pub total_amount: f64,
    pub booking_time: DateTime<Utc>,
    pub verification: Option<TicketVerification>,
}

impl Booking {
    pub fn is_cancelled(&self) -> bool {
        self.status == BookingStatus::Cancelled
    }

    pub fn owned_by(&self, email: &str) -> bool {
        self.user_email.eq_ignore_ascii_case(email)
    }

    pub fn seat_count(&self) -> i32 {
        self.seat_numbers.len() as i32
    }

    /// Mark cancelled and attach the refund outcome to the payment details.
    pub fn cancel(&mut self, refund_id: Option<String>) {
        self.status = BookingStatus::Cancelled;
        if let Some(refund_id) = refund_id {
            self.payment_status = PaymentStatus::Refunded;
            if let serde_json::Value::Object(ref mut map) = self.payment_details {
                map.insert("refundId".into(), serde_json::Value::String(refund_id));
                map.insert(
                    "refundedAt".into(),
                    serde_json::Value::String(Utc::now().to_rfc3339()),
                );
            }
        }
    }
}

/// Booking row written by the committer
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub slot_id: i32,
    pub user_email: String,
    pub seat_numbers: Vec<String>,
    pub payment_id: String,
    pub payment_method: String,
    pub payment_details: serde_json::Value,
    pub total_amount: f64,
    pub booking_time: DateTime<Utc>,
}

//! Booking DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::domain::payment::CardDetails;
use crate::domain::{Booking, TicketVerification};

fn default_payment_method() -> String {
    "MOCK_PAYMENT".to_string()
}

fn validate_amount(amount: f64) -> Result<(), ValidationError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new("amount").with_message("totalAmount must be positive".into()))
    }
}

fn validate_card_number(number: &str) -> Result<(), ValidationError> {
    let digits = number.trim();
    if (13..=19).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("card_number").with_message("card number must be 13-19 digits".into()))
    }
}

fn validate_expiry(expiry: &str) -> Result<(), ValidationError> {
    let b = expiry.as_bytes();
    let shaped = b.len() == 5
        && b[2] == b'/'
        && b[..2].iter().chain(&b[3..]).all(u8::is_ascii_digit);
    let month_ok = shaped && matches!(expiry[..2].parse::<u8>(), Ok(1..=12));
    if month_ok {
        Ok(())
    } else {
        Err(ValidationError::new("expiry").with_message("expiry date must be MM/YY".into()))
    }
}

fn validate_cvv(cvv: &str) -> Result<(), ValidationError> {
    if (3..=4).contains(&cvv.len()) && cvv.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("cvv").with_message("cvv must be 3-4 digits".into()))
    }
}

/// Body of `POST /api/bookings/payment`
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBookingRequest {
    #[validate(range(min = 1, message = "slotId is required"))]
    pub slot_id: i32,
    #[validate(length(min = 1, message = "at least one seat is required"))]
    pub seat_numbers: Vec<String>,
    #[validate(custom(function = "validate_amount"))]
    pub total_amount: f64,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
    #[validate(custom(function = "validate_card_number"))]
    pub card_number: String,
    #[validate(length(min = 2, max = 50, message = "card holder name must be 2-50 characters"))]
    pub card_holder_name: String,
    /// `MM/YY`
    #[validate(custom(function = "validate_expiry"))]
    pub expiry_date: String,
    #[validate(custom(function = "validate_cvv"))]
    pub cvv: String,
}

impl PaymentBookingRequest {
    pub fn card(&self) -> CardDetails {
        CardDetails {
            card_number: self.card_number.trim().to_string(),
            card_holder_name: self.card_holder_name.trim().to_string(),
            expiry_date: self.expiry_date.clone(),
            cvv: self.cvv.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerificationDto {
    pub verification_token: String,
    pub qr_code: String,
    pub is_verified: bool,
}

impl From<TicketVerification> for VerificationDto {
    fn from(v: TicketVerification) -> Self {
        Self {
            verification_token: v.verification_token,
            qr_code: v.qr_code,
            is_verified: v.is_verified,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingDto {
    pub id: i32,
    pub slot_id: i32,
    pub user_email: String,
    pub seat_numbers: Vec<String>,
    /// `CONFIRMED` or `CANCELLED`
    pub status: String,
    /// `COMPLETED` or `REFUNDED`
    pub payment_status: String,
    pub payment_id: Option<String>,
    pub payment_method: String,
    #[schema(value_type = Object)]
    pub payment_details: serde_json::Value,
    pub total_amount: f64,
    /// RFC 3339
    pub booking_time: String,
    pub verification: Option<VerificationDto>,
}

impl From<Booking> for BookingDto {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            slot_id: b.slot_id,
            user_email: b.user_email,
            seat_numbers: b.seat_numbers,
            status: b.status.as_str().to_string(),
            payment_status: b.payment_status.as_str().to_string(),
            payment_id: b.payment_id,
            payment_method: b.payment_method,
            payment_details: b.payment_details,
            total_amount: b.total_amount,
            booking_time: b.booking_time.to_rfc3339(),
            verification: b.verification.map(Into::into),
        }
    }
}

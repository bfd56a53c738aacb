//! Payment collaborator port
//!
//! The committer treats the gateway as an opaque synchronous call: one
//! attempt, no retry.

use async_trait::async_trait;

use crate::domain::DomainResult;

/// Card data supplied with a payment request
#[derive(Debug, Clone)]
pub struct CardDetails {
    pub card_number: String,
    pub card_holder_name: String,
    /// `MM/YY`
    pub expiry_date: String,
    pub cvv: String,
}

impl CardDetails {
    /// `**** **** **** 1234`
    pub fn masked_number(&self) -> String {
        let digits = self.card_number.trim();
        if digits.len() < 4 {
            return "****".to_string();
        }
        format!("**** **** **** {}", &digits[digits.len() - 4..])
    }

    pub fn card_type(&self) -> &'static str {
        match self.card_number.trim().chars().next() {
            Some('4') => "Visa",
            Some('5') => "Mastercard",
            Some('3') => "American Express",
            Some('6') => "Discover",
            _ => "Generic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayStatus {
    Success,
    Failed,
}

/// Result of a charge attempt
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    pub status: GatewayStatus,
    pub payment_id: Option<String>,
    pub message: String,
    pub details: serde_json::Value,
}

impl PaymentReceipt {
    pub fn is_success(&self) -> bool {
        self.status == GatewayStatus::Success
    }
}

/// Result of a refund attempt
#[derive(Debug, Clone)]
pub struct RefundReceipt {
    pub status: GatewayStatus,
    pub refund_id: Option<String>,
    pub message: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charge `amount`. A declined charge is `Ok` with `GatewayStatus::Failed`;
    /// an `Err` means the gateway itself could not be reached.
    async fn process(
        &self,
        amount: f64,
        method: &str,
        card: &CardDetails,
    ) -> DomainResult<PaymentReceipt>;

    async fn refund(&self, payment_id: &str, amount: f64) -> DomainResult<RefundReceipt>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(number: &str) -> CardDetails {
        CardDetails {
            card_number: number.into(),
            card_holder_name: "Jane Roe".into(),
            expiry_date: "12/29".into(),
            cvv: "123".into(),
        }
    }

    #[test]
    fn masks_all_but_last_four() {
        assert_eq!(card("4111111111111234").masked_number(), "**** **** **** 1234");
    }

    #[test]
    fn card_type_from_leading_digit() {
        assert_eq!(card("4111111111111111").card_type(), "Visa");
        assert_eq!(card("5500000000000004").card_type(), "Mastercard");
        assert_eq!(card("340000000000009").card_type(), "American Express");
        assert_eq!(card("6011000000000004").card_type(), "Discover");
        assert_eq!(card("9999999999999").card_type(), "Generic");
    }
}

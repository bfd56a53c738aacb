//! Mock payment gateway
//!
//! Validates card fields, then approves with probability `1 - decline_rate`.
//! Refunds always succeed.

use async_trait::async_trait;
use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::payment::{
    CardDetails, GatewayStatus, PaymentGateway, PaymentReceipt, RefundReceipt,
};
use crate::domain::DomainResult;

const GATEWAY_NAME: &str = "MOCK_GATEWAY";

pub struct MockPaymentGateway {
    decline_rate: f64,
}

impl MockPaymentGateway {
    /// `decline_rate` is clamped to `0.0..=1.0`
    pub fn new(decline_rate: f64) -> Self {
        Self {
            decline_rate: decline_rate.clamp(0.0, 1.0),
        }
    }

    /// Gateway that approves every valid card
    pub fn always_approve() -> Self {
        Self::new(0.0)
    }
}

impl Default for MockPaymentGateway {
    fn default() -> Self {
        Self::new(0.05)
    }
}

fn random_upper(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(|b| (b as char).to_ascii_uppercase())
        .collect()
}

/// First failed card rule, if any
fn card_problem(card: &CardDetails) -> Option<&'static str> {
    let number = card.card_number.trim();
    if !(13..=19).contains(&number.len()) || !number.chars().all(|c| c.is_ascii_digit()) {
        return Some("Invalid card number");
    }
    if card.card_holder_name.trim().is_empty() {
        return Some("Card holder name is required");
    }
    let expiry = card.expiry_date.as_bytes();
    let expiry_ok = expiry.len() == 5
        && expiry[2] == b'/'
        && expiry[..2].iter().chain(&expiry[3..]).all(|b| b.is_ascii_digit());
    if !expiry_ok {
        return Some("Invalid expiry date format (MM/YY)");
    }
    if !(3..=4).contains(&card.cvv.len()) {
        return Some("Invalid CVV");
    }
    None
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn process(
        &self,
        amount: f64,
        method: &str,
        card: &CardDetails,
    ) -> DomainResult<PaymentReceipt> {
        if let Some(problem) = card_problem(card) {
            warn!(reason = problem, "Payment rejected: invalid card details");
            return Ok(PaymentReceipt {
                status: GatewayStatus::Failed,
                payment_id: None,
                message: problem.to_string(),
                details: json!({ "gateway": GATEWAY_NAME, "failureReason": problem }),
            });
        }

        let declined = rand::thread_rng().gen_bool(self.decline_rate);
        if declined {
            info!(amount, "Mock payment declined");
            return Ok(PaymentReceipt {
                status: GatewayStatus::Failed,
                payment_id: None,
                message: "Payment declined by bank".to_string(),
                details: json!({ "gateway": GATEWAY_NAME, "failureReason": "DECLINED" }),
            });
        }

        let payment_id = format!("MOCK_PAY_{}", random_upper(8));
        let transaction_id = format!("TXN_{}", random_upper(12));
        info!(%payment_id, amount, "Mock payment approved");

        Ok(PaymentReceipt {
            status: GatewayStatus::Success,
            payment_id: Some(payment_id),
            message: "Payment processed successfully".to_string(),
            details: json!({
                "gateway": GATEWAY_NAME,
                "transactionId": transaction_id,
                "paymentMethod": method,
                "maskedCardNumber": card.masked_number(),
                "cardType": card.card_type(),
                "cardHolderName": card.card_holder_name,
                "amount": amount,
                "processedAt": Utc::now().to_rfc3339(),
            }),
        })
    }

    async fn refund(&self, payment_id: &str, amount: f64) -> DomainResult<RefundReceipt> {
        let refund_id = format!("REFUND_{}", random_upper(10));
        info!(%payment_id, %refund_id, amount, "Mock refund issued");
        Ok(RefundReceipt {
            status: GatewayStatus::Success,
            refund_id: Some(refund_id),
            message: "Refund processed successfully".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> CardDetails {
        CardDetails {
            card_number: "4111111111111111".into(),
            card_holder_name: "Jane Roe".into(),
            expiry_date: "12/29".into(),
            cvv: "123".into(),
        }
    }

    #[tokio::test]
    async fn approves_valid_card_with_zero_decline_rate() {
        let gateway = MockPaymentGateway::always_approve();
        let receipt = gateway.process(200.0, "MOCK_PAYMENT", &card()).await.unwrap();

        assert!(receipt.is_success());
        let payment_id = receipt.payment_id.unwrap();
        assert!(payment_id.starts_with("MOCK_PAY_"));
        assert_eq!(payment_id.len(), "MOCK_PAY_".len() + 8);
        assert_eq!(receipt.details["cardType"], "Visa");
        assert_eq!(receipt.details["maskedCardNumber"], "**** **** **** 1111");
    }

    #[tokio::test]
    async fn declines_everything_with_full_decline_rate() {
        let gateway = MockPaymentGateway::new(1.0);
        let receipt = gateway.process(50.0, "MOCK_PAYMENT", &card()).await.unwrap();
        assert_eq!(receipt.status, GatewayStatus::Failed);
        assert!(receipt.payment_id.is_none());
    }

    #[tokio::test]
    async fn rejects_malformed_expiry() {
        let gateway = MockPaymentGateway::always_approve();
        let mut bad = card();
        bad.expiry_date = "2029-12".into();
        let receipt = gateway.process(50.0, "MOCK_PAYMENT", &bad).await.unwrap();
        assert!(!receipt.is_success());
        assert_eq!(receipt.message, "Invalid expiry date format (MM/YY)");
    }

    #[tokio::test]
    async fn rejects_short_card_number() {
        let gateway = MockPaymentGateway::always_approve();
        let mut bad = card();
        bad.card_number = "4111".into();
        let receipt = gateway.process(50.0, "MOCK_PAYMENT", &bad).await.unwrap();
        assert_eq!(receipt.message, "Invalid card number");
    }

    #[tokio::test]
    async fn refund_returns_refund_id() {
        let gateway = MockPaymentGateway::default();
        let receipt = gateway.refund("MOCK_PAY_ABCDEFGH", 100.0).await.unwrap();
        assert_eq!(receipt.status, GatewayStatus::Success);
        assert!(receipt.refund_id.unwrap().starts_with("REFUND_"));
    }
}

//! Ticket verification data
//!
//! Generated once per booking right after the commit. Failures here are
//! logged by the caller and never undo the booking.

use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{DomainResult, RepositoryProvider, TicketVerification};

const RANDOM_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[async_trait]
pub trait TicketVerifier: Send + Sync {
    /// Provision verification data for the booking. Returns `None` when
    /// the booking already had some.
    async fn generate(&self, booking_id: i32) -> DomainResult<Option<TicketVerification>>;
}

pub struct RepositoryTicketVerifier {
    repos: Arc<dyn RepositoryProvider>,
}

impl RepositoryTicketVerifier {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }
}

#[async_trait]
impl TicketVerifier for RepositoryTicketVerifier {
    async fn generate(&self, booking_id: i32) -> DomainResult<Option<TicketVerification>> {
        let verification = new_verification();
        let attached = self
            .repos
            .bookings()
            .attach_verification(booking_id, &verification)
            .await?;

        if !attached {
            debug!(booking_id, "Verification data already present");
            return Ok(None);
        }
        debug!(booking_id, "Verification data generated");
        Ok(Some(verification))
    }
}

fn new_verification() -> TicketVerification {
    let token = URL_SAFE_NO_PAD.encode(Uuid::new_v4().simple().to_string());
    let mut rng = rand::thread_rng();
    let random: String = (0..8)
        .map(|_| RANDOM_ALPHABET[rng.gen_range(0..RANDOM_ALPHABET.len())] as char)
        .collect();

    TicketVerification {
        qr_code: format!("{}:{}", token, random),
        verification_token: token,
        random_string: random,
        is_verified: false,
        verification_time: None,
        verified_by: None,
    }
}

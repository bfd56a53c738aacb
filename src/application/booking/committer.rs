//! Booking commit and cancellation
//!
//! A commit re-derives availability from the inventory store inside one
//! transaction, charges the card, then marks seats booked, records the
//! booking and decrements the slot counter. Temporary locks are not
//! consulted. Any failure before the final commit rolls everything back.
//!
//! Two commits for overlapping seats cannot both succeed. The seat read
//! takes the write lock, so the second one either waits for the first
//! transaction and then sees the seats booked, or fails busy with an error
//! that maps to a conflict on the requested seats. Both happen before the
//! card is charged.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::selection_cache::{SelectionCache, SelectionKey};
use super::verification::TicketVerifier;
use crate::domain::payment::{CardDetails, PaymentGateway};
use crate::domain::seat::{missing_numbers, total_price};
use crate::domain::{
    Booking, DomainError, DomainResult, GatewayStatus, NewBooking, PaymentStatus, RepositoryProvider,
    UnitOfWork,
};

/// Absolute tolerance between the client's total and the seat prices
pub const DEFAULT_AMOUNT_TOLERANCE: f64 = 0.01;

/// Payment request as validated by the HTTP layer
#[derive(Debug, Clone)]
pub struct CommitRequest {
    pub slot_id: i32,
    pub seat_numbers: Vec<String>,
    pub total_amount: f64,
    pub payment_method: String,
    pub card: CardDetails,
    pub user_email: String,
}

/// Progress of one commit attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStage {
    Validating,
    Paying,
    Committed,
}

impl CommitStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validating => "VALIDATING",
            Self::Paying => "PAYING",
            Self::Committed => "COMMITTED",
        }
    }
}

/// Permission to act on bookings of other users. Only obtainable from an
/// admin role.
#[derive(Debug, Clone, Copy)]
pub struct BookingOverride {
    _private: (),
}

impl BookingOverride {
    pub fn from_role(role: &str) -> Option<Self> {
        role.eq_ignore_ascii_case("admin")
            .then_some(Self { _private: () })
    }
}

pub struct BookingCommitter {
    repos: Arc<dyn RepositoryProvider>,
    payment: Arc<dyn PaymentGateway>,
    verifier: Arc<dyn TicketVerifier>,
    cache: Arc<SelectionCache>,
    amount_tolerance: f64,
}

impl BookingCommitter {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        payment: Arc<dyn PaymentGateway>,
        verifier: Arc<dyn TicketVerifier>,
        cache: Arc<SelectionCache>,
    ) -> Self {
        Self {
            repos,
            payment,
            verifier,
            cache,
            amount_tolerance: DEFAULT_AMOUNT_TOLERANCE,
        }
    }

    pub fn with_amount_tolerance(mut self, tolerance: f64) -> Self {
        self.amount_tolerance = tolerance.abs();
        self
    }

    /// Convert the requested seats into a CONFIRMED booking.
    pub async fn commit(&self, request: CommitRequest) -> DomainResult<Booking> {
        let result = self.commit_in_transaction(&request).await;

        let mut booking = match result {
            Ok(booking) => booking,
            Err(e) => {
                let e = match e {
                    DomainError::SeatConflict(seats) if seats.is_empty() => {
                        DomainError::SeatConflict(request.seat_numbers.clone())
                    }
                    other => other,
                };
                record_failure(&request, &e);
                return Err(e);
            }
        };

        metrics::counter!("bookings_committed_total").increment(1);
        info!(
            booking_id = booking.id,
            slot_id = booking.slot_id,
            user = %booking.user_email,
            seats = ?booking.seat_numbers,
            amount = booking.total_amount,
            stage = CommitStage::Committed.as_str(),
            "Booking committed"
        );

        match self.verifier.generate(booking.id).await {
            Ok(verification) => booking.verification = verification,
            Err(e) => warn!(booking_id = booking.id, error = %e, "Ticket verification failed"),
        }
        self.cache
            .remove(&SelectionKey::new(request.user_email.as_str(), request.slot_id));

        Ok(booking)
    }

    async fn commit_in_transaction(&self, request: &CommitRequest) -> DomainResult<Booking> {
        debug!(
            slot_id = request.slot_id,
            seats = ?request.seat_numbers,
            stage = CommitStage::Validating.as_str(),
            "Commit attempt"
        );
        validate_seat_numbers(&request.seat_numbers)?;

        let uow = self.repos.begin().await?;

        let slot = uow
            .find_slot(request.slot_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Slot", "id", request.slot_id))?;

        let seats = uow.seats_for_update(slot.id, &request.seat_numbers).await?;
        let missing = missing_numbers(&request.seat_numbers, &seats);
        if !missing.is_empty() {
            return Err(DomainError::not_found("Seat", "seat_number", missing.join(", ")));
        }

        let in_bookings = uow
            .seats_in_confirmed_bookings(slot.id, &request.seat_numbers)
            .await?;
        let unavailable: Vec<String> = request
            .seat_numbers
            .iter()
            .filter(|n| {
                in_bookings.contains(*n)
                    || seats.iter().any(|s| &s.seat_number == *n && s.booked)
            })
            .cloned()
            .collect();
        if !unavailable.is_empty() {
            return Err(DomainError::SeatConflict(unavailable));
        }

        let expected = total_price(&seats);
        if (request.total_amount - expected).abs() > self.amount_tolerance {
            return Err(DomainError::Validation(format!(
                "Amount mismatch: expected {:.2}, got {:.2}",
                expected, request.total_amount
            )));
        }

        debug!(
            slot_id = slot.id,
            amount = expected,
            stage = CommitStage::Paying.as_str(),
            "Charging"
        );
        let receipt = self
            .payment
            .process(request.total_amount, &request.payment_method, &request.card)
            .await
            .map_err(|e| DomainError::PaymentFailed(e.to_string()))?;
        if !receipt.is_success() {
            return Err(DomainError::PaymentFailed(receipt.message));
        }
        let payment_id = receipt
            .payment_id
            .ok_or_else(|| DomainError::PaymentFailed("Gateway returned no payment id".into()))?;

        let seat_ids: Vec<i32> = seats.iter().map(|s| s.id).collect();
        uow.set_seats_booked(&seat_ids, true).await?;
        let booking = uow
            .insert_booking(NewBooking {
                slot_id: slot.id,
                user_email: request.user_email.clone(),
                seat_numbers: request.seat_numbers.clone(),
                payment_id,
                payment_method: request.payment_method.clone(),
                payment_details: receipt.details,
                total_amount: request.total_amount,
                booking_time: Utc::now(),
            })
            .await?;
        uow.adjust_available_seats(slot.id, -(seat_ids.len() as i32))
            .await?;

        uow.commit().await?;
        Ok(booking)
    }

    /// Cancel the caller's booking, refunding when possible.
    ///
    /// The refund is best-effort: when it fails the booking is still
    /// cancelled and the payment status stays COMPLETED.
    pub async fn cancel(&self, booking_id: i32, user_email: &str) -> DomainResult<Booking> {
        self.cancel_checked(booking_id, Some(user_email)).await
    }

    /// Cancel any user's booking. Same refund and seat release as
    /// [`BookingCommitter::cancel`] without the owner check.
    pub async fn cancel_as_admin(
        &self,
        booking_id: i32,
        _cap: BookingOverride,
    ) -> DomainResult<Booking> {
        self.cancel_checked(booking_id, None).await
    }

    async fn cancel_checked(&self, booking_id: i32, owner: Option<&str>) -> DomainResult<Booking> {
        let uow = self.repos.begin().await?;

        let mut booking = uow
            .find_booking_for_update(booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", "id", booking_id))?;
        if owner.is_some_and(|email| !booking.owned_by(email)) {
            return Err(DomainError::Forbidden(
                "Booking belongs to another user".into(),
            ));
        }
        if booking.is_cancelled() {
            return Err(DomainError::Validation("Booking is already cancelled".into()));
        }

        let refund_id = self.try_refund(&booking).await;
        booking.cancel(refund_id);
        uow.update_booking(&booking).await?;

        release_seats(&*uow, &booking).await?;
        uow.commit().await?;

        info!(
            booking_id,
            slot_id = booking.slot_id,
            seats = ?booking.seat_numbers,
            refunded = booking.payment_status == PaymentStatus::Refunded,
            by_admin = owner.is_none(),
            "Booking cancelled"
        );
        Ok(booking)
    }

    async fn try_refund(&self, booking: &Booking) -> Option<String> {
        let payment_id = booking.payment_id.as_deref()?;
        match self.payment.refund(payment_id, booking.total_amount).await {
            Ok(receipt) if receipt.status == GatewayStatus::Success => {
                receipt.refund_id
            }
            Ok(receipt) => {
                warn!(booking_id = booking.id, reason = %receipt.message, "Refund declined");
                None
            }
            Err(e) => {
                warn!(booking_id = booking.id, error = %e, "Refund failed");
                None
            }
        }
    }

    /// Owner or admin only
    pub async fn get(&self, booking_id: i32, user_email: &str, is_admin: bool) -> DomainResult<Booking> {
        let booking = self
            .repos
            .bookings()
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", "id", booking_id))?;
        if !is_admin && !booking.owned_by(user_email) {
            return Err(DomainError::Forbidden(
                "Booking belongs to another user".into(),
            ));
        }
        Ok(booking)
    }

    pub async fn list_for_user(&self, user_email: &str) -> DomainResult<Vec<Booking>> {
        self.repos.bookings().find_by_user(user_email).await
    }

    /// Every booking, newest first
    pub async fn list_all(&self) -> DomainResult<Vec<Booking>> {
        self.repos.bookings().find_all().await
    }

    pub async fn list_for_slot(&self, slot_id: i32) -> DomainResult<Vec<Booking>> {
        self.repos
            .slots()
            .find_by_id(slot_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Slot", "id", slot_id))?;
        self.repos.bookings().find_by_slot(slot_id).await
    }
}

fn validate_seat_numbers(seat_numbers: &[String]) -> DomainResult<()> {
    if seat_numbers.is_empty() {
        return Err(DomainError::Validation("seatNumbers must not be empty".into()));
    }
    let mut unique = seat_numbers.to_vec();
    unique.sort();
    unique.dedup();
    if unique.len() != seat_numbers.len() {
        return Err(DomainError::Validation("Duplicate seat numbers".into()));
    }
    Ok(())
}

async fn release_seats(uow: &dyn UnitOfWork, booking: &Booking) -> DomainResult<()> {
    let seats = uow
        .seats_for_update(booking.slot_id, &booking.seat_numbers)
        .await?;
    let ids: Vec<i32> = seats.iter().map(|s| s.id).collect();
    uow.set_seats_booked(&ids, false).await?;
    uow.adjust_available_seats(booking.slot_id, booking.seat_count())
        .await
}

fn failure_reason(e: &DomainError) -> &'static str {
    match e {
        DomainError::SeatConflict(_) => "conflict",
        DomainError::PaymentFailed(_) => "payment_failed",
        DomainError::Validation(_) => "validation",
        DomainError::NotFound { .. } => "not_found",
        _ => "internal",
    }
}

fn record_failure(request: &CommitRequest, e: &DomainError) {
    let reason = failure_reason(e);
    metrics::counter!("booking_commit_failures_total", "reason" => reason).increment(1);
    match e {
        DomainError::Internal(_) => warn!(
            slot_id = request.slot_id,
            seats = ?request.seat_numbers,
            error = %e,
            "Booking commit failed"
        ),
        _ => info!(
            slot_id = request.slot_id,
            seats = ?request.seat_numbers,
            reason,
            error = %e,
            "Booking commit rejected"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::booking::lock_manager::LockManager;
    use crate::application::booking::selection::{SeatSelectionService, Selection};
    use crate::application::booking::selection_cache::DEFAULT_SELECTION_TTL;
    use crate::application::booking::verification::RepositoryTicketVerifier;
    use crate::domain::{BookingStatus, Slot, TicketVerification};
    use crate::test_support::{card, file_repos, memory_repos, seats, seed_scenario, ScriptedGateway};
    use async_trait::async_trait;

    struct Fixture {
        repos: Arc<dyn RepositoryProvider>,
        committer: BookingCommitter,
        cache: Arc<SelectionCache>,
        slot: Slot,
    }

    async fn fixture(gateway: Arc<ScriptedGateway>) -> Fixture {
        let repos = memory_repos().await;
        let slot = seed_scenario(&repos).await;
        let cache = Arc::new(SelectionCache::new(DEFAULT_SELECTION_TTL));
        let committer = BookingCommitter::new(
            repos.clone(),
            gateway,
            Arc::new(RepositoryTicketVerifier::new(repos.clone())),
            cache.clone(),
        );
        Fixture {
            repos,
            committer,
            cache,
            slot,
        }
    }

    fn request(slot_id: i32, numbers: &[&str], amount: f64, email: &str) -> CommitRequest {
        CommitRequest {
            slot_id,
            seat_numbers: seats(numbers),
            total_amount: amount,
            payment_method: "MOCK_PAYMENT".into(),
            card: card(),
            user_email: email.into(),
        }
    }

    async fn available(f: &Fixture) -> i32 {
        f.repos
            .slots()
            .find_by_id(f.slot.id)
            .await
            .unwrap()
            .unwrap()
            .available_seats
    }

    #[tokio::test]
    async fn lock_then_commit_scenario() {
        let gateway = ScriptedGateway::approving();
        let f = fixture(gateway.clone()).await;
        let locks = Arc::new(LockManager::with_default_duration(f.repos.clone()));
        let selection = SeatSelectionService::new(f.repos.clone(), locks, f.cache.clone());

        let x = selection
            .select(f.slot.id, &seats(&["A1", "A2"]), "session_x", "x@example.com")
            .await
            .unwrap();
        assert!(matches!(x, Selection::Locked(_)));

        let y = selection
            .select(f.slot.id, &seats(&["A2", "A3"]), "session_y", "y@example.com")
            .await
            .unwrap();
        assert!(matches!(y, Selection::Conflict(ref c) if c == &vec!["A2".to_string()]));
        assert!(selection
            .lock_manager()
            .locks_for_session("session_y")
            .await
            .unwrap()
            .is_empty());

        let booking = f
            .committer
            .commit(request(f.slot.id, &["A1", "A2"], 200.0, "x@example.com"))
            .await
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.seat_numbers, vec!["A1", "A2"]);
        assert!(booking.verification.is_some());
        assert_eq!(available(&f).await, 1);

        let booked = f
            .repos
            .seats()
            .find_by_numbers(f.slot.id, &seats(&["A1", "A2", "A3"]))
            .await
            .unwrap();
        for seat in booked {
            assert_eq!(seat.booked, seat.seat_number != "A3");
        }
        assert!(f.cache.get(&SelectionKey::new("x@example.com", f.slot.id)).is_none());

        let again = f
            .committer
            .commit(request(f.slot.id, &["A1"], 100.0, "someone@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(again, DomainError::SeatConflict(c) if c == vec!["A1".to_string()]));
        assert_eq!(gateway.charge_count(), 1);
    }

    #[tokio::test]
    async fn overlapping_concurrent_commits_book_once() {
        let f = fixture(ScriptedGateway::approving()).await;

        let (a, b) = tokio::join!(
            f.committer
                .commit(request(f.slot.id, &["A1", "A2"], 200.0, "a@example.com")),
            f.committer
                .commit(request(f.slot.id, &["A2", "A3"], 150.0, "b@example.com")),
        );

        let outcomes = [a, b];
        let committed: Vec<&Booking> = outcomes.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(committed.len(), 1);
        assert!(outcomes
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, DomainError::SeatConflict(c) if c.contains(&"A2".to_string()))));

        let winner = committed[0];
        assert_eq!(available(&f).await, 3 - winner.seat_count());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_commits_charge_only_the_winner() {
        let (repos, path) = file_repos("racing_commits").await;
        let slot = seed_scenario(&repos).await;
        let gateway = ScriptedGateway::approving();
        let committer = Arc::new(BookingCommitter::new(
            repos.clone(),
            gateway.clone(),
            Arc::new(RepositoryTicketVerifier::new(repos.clone())),
            Arc::new(SelectionCache::new(DEFAULT_SELECTION_TTL)),
        ));

        let slot_id = slot.id;
        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let committer = committer.clone();
                let email = format!("buyer{i}@example.com");
                tokio::spawn(async move {
                    committer
                        .commit(request(slot_id, &["A1", "A2"], 200.0, &email))
                        .await
                })
            })
            .collect();

        let mut committed = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => committed += 1,
                Err(e) => assert!(matches!(e, DomainError::SeatConflict(_)), "unexpected {e}"),
            }
        }

        assert_eq!(committed, 1);
        assert_eq!(gateway.charge_count(), 1);
        let left = repos.slots().find_by_id(slot.id).await.unwrap().unwrap();
        assert_eq!(left.available_seats, 1);

        drop(committer);
        drop(repos);
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn amount_must_match_within_tolerance() {
        let f = fixture(ScriptedGateway::approving()).await;

        let err = f
            .committer
            .commit(request(f.slot.id, &["A1", "A3"], 150.02, "v@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(available(&f).await, 3);

        let ok = f
            .committer
            .commit(request(f.slot.id, &["A1", "A3"], 150.005, "v@example.com"))
            .await;
        assert!(ok.is_ok());
    }

    #[tokio::test]
    async fn declined_payment_leaves_inventory_untouched() {
        let gateway = ScriptedGateway::declining();
        let f = fixture(gateway.clone()).await;

        let err = f
            .committer
            .commit(request(f.slot.id, &["A1"], 100.0, "v@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::PaymentFailed(_)));
        assert_eq!(gateway.charge_count(), 1);
        assert_eq!(available(&f).await, 3);

        let seat = f
            .repos
            .seats()
            .find_by_numbers(f.slot.id, &seats(&["A1"]))
            .await
            .unwrap();
        assert!(!seat[0].booked);
        assert!(f.committer.list_for_user("v@example.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_seats_are_listed() {
        let gateway = ScriptedGateway::approving();
        let f = fixture(gateway.clone()).await;

        let err = f
            .committer
            .commit(request(f.slot.id, &["A1", "Q1", "Q2"], 100.0, "v@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { value, .. } if value == "Q1, Q2"));
        assert_eq!(gateway.charge_count(), 0);
    }

    #[tokio::test]
    async fn unknown_slot_is_not_found() {
        let f = fixture(ScriptedGateway::approving()).await;
        let err = f
            .committer
            .commit(request(404, &["A1"], 100.0, "v@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Slot", .. }));
    }

    #[tokio::test]
    async fn cancel_refunds_and_restores_seats() {
        let gateway = ScriptedGateway::approving();
        let f = fixture(gateway.clone()).await;
        let booking = f
            .committer
            .commit(request(f.slot.id, &["A1", "A2"], 200.0, "v@example.com"))
            .await
            .unwrap();
        assert_eq!(available(&f).await, 1);

        let cancelled = f.committer.cancel(booking.id, "V@example.com").await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert_eq!(cancelled.payment_status, PaymentStatus::Refunded);
        assert_eq!(available(&f).await, 3);

        let rebook = f
            .committer
            .commit(request(f.slot.id, &["A2"], 100.0, "w@example.com"))
            .await;
        assert!(rebook.is_ok());

        let twice = f.committer.cancel(booking.id, "v@example.com").await.unwrap_err();
        assert!(matches!(twice, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn refund_failure_still_cancels() {
        let gateway = ScriptedGateway::broken_refunds();
        let f = fixture(gateway.clone()).await;
        let booking = f
            .committer
            .commit(request(f.slot.id, &["A3"], 50.0, "v@example.com"))
            .await
            .unwrap();

        let cancelled = f.committer.cancel(booking.id, "v@example.com").await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert_eq!(cancelled.payment_status, PaymentStatus::Completed);
        assert_eq!(available(&f).await, 3);

        let stored = f.repos.bookings().find_by_id(booking.id).await.unwrap().unwrap();
        assert!(stored.is_cancelled());
    }

    #[tokio::test]
    async fn only_owner_cancels_and_reads() {
        let f = fixture(ScriptedGateway::approving()).await;
        let booking = f
            .committer
            .commit(request(f.slot.id, &["A1"], 100.0, "owner@example.com"))
            .await
            .unwrap();

        let err = f.committer.cancel(booking.id, "other@example.com").await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
        assert_eq!(available(&f).await, 2);

        let err = f
            .committer
            .get(booking.id, "other@example.com", false)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
        assert!(f.committer.get(booking.id, "other@example.com", true).await.is_ok());
        assert_eq!(f.committer.list_for_slot(f.slot.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn admin_cancels_any_booking() {
        assert!(BookingOverride::from_role("user").is_none());
        let cap = BookingOverride::from_role("ADMIN").unwrap();

        let gateway = ScriptedGateway::approving();
        let f = fixture(gateway.clone()).await;
        let first = f
            .committer
            .commit(request(f.slot.id, &["A1", "A2"], 200.0, "owner@example.com"))
            .await
            .unwrap();
        f.committer
            .commit(request(f.slot.id, &["A3"], 50.0, "second@example.com"))
            .await
            .unwrap();
        assert_eq!(available(&f).await, 0);

        let all = f.committer.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].id, first.id);

        let cancelled = f.committer.cancel_as_admin(first.id, cap).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert_eq!(cancelled.payment_status, PaymentStatus::Refunded);
        assert_eq!(gateway.refunds.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(available(&f).await, 2);

        let twice = f.committer.cancel_as_admin(first.id, cap).await.unwrap_err();
        assert!(matches!(twice, DomainError::Validation(_)));
        let missing = f.committer.cancel_as_admin(999, cap).await.unwrap_err();
        assert!(matches!(missing, DomainError::NotFound { entity: "Booking", .. }));
    }

    struct BrokenVerifier;

    #[async_trait]
    impl TicketVerifier for BrokenVerifier {
        async fn generate(&self, _booking_id: i32) -> DomainResult<Option<TicketVerification>> {
            Err(DomainError::Internal("verification store down".into()))
        }
    }

    #[tokio::test]
    async fn verification_failure_keeps_booking() {
        let repos = memory_repos().await;
        let slot = seed_scenario(&repos).await;
        let committer = BookingCommitter::new(
            repos.clone(),
            ScriptedGateway::approving(),
            Arc::new(BrokenVerifier),
            Arc::new(SelectionCache::new(DEFAULT_SELECTION_TTL)),
        );

        let booking = committer
            .commit(request(slot.id, &["A1"], 100.0, "v@example.com"))
            .await
            .unwrap();
        assert!(booking.verification.is_none());
        assert!(repos.bookings().find_by_id(booking.id).await.unwrap().is_some());
    }
}

//! Seat availability and selection
//!
//! Resolves requested seat numbers for a slot, takes temporary locks via
//! [`LockManager`] and caches the priced snapshot the client was shown.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::debug;

use super::lock_manager::LockManager;
use super::selection_cache::{SelectionCache, SelectionKey};
use crate::domain::seat::{missing_numbers, total_price, Seat};
use crate::domain::{DomainError, DomainResult, RepositoryProvider, Slot};

#[derive(Debug, Clone, PartialEq)]
pub struct SeatPrice {
    pub seat_number: String,
    pub price: f64,
}

/// Priced view of a selection
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSnapshot {
    pub slot_id: i32,
    pub seat_numbers: Vec<String>,
    pub seat_details: Vec<SeatPrice>,
    pub total_amount: f64,
    pub movie_title: String,
    pub show_date: NaiveDate,
    pub start_time: NaiveTime,
    pub theater_name: String,
    pub screen_type: String,
    pub session_id: String,
    pub lock_expires_at: DateTime<Utc>,
}

impl SelectionSnapshot {
    fn new(slot: &Slot, seats: &[Seat], session_id: &str, lock_expires_at: DateTime<Utc>) -> Self {
        Self {
            slot_id: slot.id,
            seat_numbers: seats.iter().map(|s| s.seat_number.clone()).collect(),
            seat_details: seats
                .iter()
                .map(|s| SeatPrice {
                    seat_number: s.seat_number.clone(),
                    price: s.price,
                })
                .collect(),
            total_amount: total_price(seats),
            movie_title: slot.movie_title.clone(),
            show_date: slot.show_date,
            start_time: slot.start_time,
            theater_name: slot.theater_name.clone(),
            screen_type: slot.screen_type.clone(),
            session_id: session_id.to_string(),
            lock_expires_at,
        }
    }
}

/// Outcome of a selection attempt
#[derive(Debug, Clone)]
pub enum Selection {
    Locked(SelectionSnapshot),
    /// Seats held by other sessions or already booked; nothing was locked
    Conflict(Vec<String>),
}

pub struct SeatSelectionService {
    repos: Arc<dyn RepositoryProvider>,
    locks: Arc<LockManager>,
    cache: Arc<SelectionCache>,
}

impl SeatSelectionService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        locks: Arc<LockManager>,
        cache: Arc<SelectionCache>,
    ) -> Self {
        Self {
            repos,
            locks,
            cache,
        }
    }

    pub fn lock_manager(&self) -> &Arc<LockManager> {
        &self.locks
    }

    async fn load_slot(&self, slot_id: i32) -> DomainResult<Slot> {
        self.repos
            .slots()
            .find_by_id(slot_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Slot", "id", slot_id))
    }

    /// Resolve all numbers or fail NotFound listing the missing ones.
    async fn resolve_seats(&self, slot_id: i32, seat_numbers: &[String]) -> DomainResult<Vec<Seat>> {
        let found = self
            .repos
            .seats()
            .find_by_numbers(slot_id, seat_numbers)
            .await?;
        let missing = missing_numbers(seat_numbers, &found);
        if !missing.is_empty() {
            return Err(DomainError::not_found("Seat", "seat_number", missing.join(", ")));
        }
        // Keep request order
        Ok(seat_numbers
            .iter()
            .filter_map(|n| found.iter().find(|s| &s.seat_number == n).cloned())
            .collect())
    }

    /// Per requested number: true when the seat exists, is not booked and
    /// is not held by a session other than `session_id`.
    pub async fn check_availability(
        &self,
        slot_id: i32,
        seat_numbers: &[String],
        session_id: Option<&str>,
    ) -> DomainResult<BTreeMap<String, bool>> {
        if seat_numbers.is_empty() {
            return Err(DomainError::Validation("seatNumbers must not be empty".into()));
        }
        self.load_slot(slot_id).await?;

        let found = self
            .repos
            .seats()
            .find_by_numbers(slot_id, seat_numbers)
            .await?;
        let held = self.locks.held_by_others(&found, session_id).await?;

        let mut availability = BTreeMap::new();
        for number in seat_numbers {
            let available = match found.iter().find(|s| &s.seat_number == number) {
                Some(seat) if !seat.booked && !held.contains(&seat.id) => !self
                    .repos
                    .seats()
                    .is_in_confirmed_booking(slot_id, number)
                    .await?,
                _ => false,
            };
            availability.insert(number.clone(), available);
        }
        Ok(availability)
    }

    /// Lock the seats for the session and cache the priced snapshot under
    /// `(user_key, slot_id)`.
    pub async fn select(
        &self,
        slot_id: i32,
        seat_numbers: &[String],
        session_id: &str,
        user_key: &str,
    ) -> DomainResult<Selection> {
        if seat_numbers.is_empty() {
            return Err(DomainError::Validation("seatNumbers must not be empty".into()));
        }
        let mut unique = seat_numbers.to_vec();
        unique.sort();
        unique.dedup();
        if unique.len() != seat_numbers.len() {
            return Err(DomainError::Validation("Duplicate seat numbers".into()));
        }

        let slot = self.load_slot(slot_id).await?;
        let seats = self.resolve_seats(slot_id, seat_numbers).await?;

        let booked: Vec<String> = seats
            .iter()
            .filter(|s| s.booked)
            .map(|s| s.seat_number.clone())
            .collect();
        if !booked.is_empty() {
            debug!(slot_id, booked = ?booked, "Selection includes booked seats");
            return Ok(Selection::Conflict(booked));
        }

        let conflicts = self.locks.acquire(&seats, session_id).await?;
        if !conflicts.is_empty() {
            return Ok(Selection::Conflict(conflicts));
        }

        let expires_at = Utc::now() + self.locks.lock_duration();
        let snapshot = SelectionSnapshot::new(&slot, &seats, session_id, expires_at);
        self.cache
            .put(SelectionKey::new(user_key, slot_id), snapshot.clone());

        Ok(Selection::Locked(snapshot))
    }

    /// Last snapshot shown to the user for the slot, if still fresh
    pub fn cached_selection(&self, user_key: &str, slot_id: i32) -> Option<SelectionSnapshot> {
        self.cache.get(&SelectionKey::new(user_key, slot_id))
    }
}

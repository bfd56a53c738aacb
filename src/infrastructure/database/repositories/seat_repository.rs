//! SeaORM implementation of SeatRepository

use async_trait::async_trait;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::SimpleExpr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use super::db_err;
use crate::domain::booking::BookingStatus;
use crate::domain::seat::{Seat, SeatRepository};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::{booking, booking_seat, seat};

pub struct SeaOrmSeatRepository {
    db: DatabaseConnection,
}

impl SeaOrmSeatRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: seat::Model) -> Seat {
    Seat {
        id: m.id,
        slot_id: m.slot_id,
        seat_number: m.seat_number,
        price: m.price,
        booked: m.booked,
    }
}

/// Seats of a slot by number. `for_update` adds an exclusive row lock on
/// backends that support it. SQLite ignores row locks, so the rows are
/// touched first to take the database write lock before they are read.
pub(super) async fn find_seats<C: ConnectionTrait>(
    db: &C,
    slot_id: i32,
    seat_numbers: &[String],
    for_update: bool,
) -> DomainResult<Vec<Seat>> {
    if seat_numbers.is_empty() {
        return Ok(Vec::new());
    }

    if for_update && db.get_database_backend() == DatabaseBackend::Sqlite {
        touch_seats(db, slot_id, seat_numbers).await?;
    }

    let mut query = seat::Entity::find()
        .filter(seat::Column::SlotId.eq(slot_id))
        .filter(seat::Column::SeatNumber.is_in(seat_numbers.iter().cloned()))
        .order_by_asc(seat::Column::Id);
    if for_update {
        query = query.lock_exclusive();
    }

    let models = query.all(db).await.map_err(db_err)?;
    Ok(models.into_iter().map(model_to_domain).collect())
}

/// No-op write that makes the current SQLite transaction the writer.
/// Competing writers block here, or fail busy, before they read seats.
async fn touch_seats<C: ConnectionTrait>(
    db: &C,
    slot_id: i32,
    seat_numbers: &[String],
) -> DomainResult<()> {
    seat::Entity::update_many()
        .col_expr(seat::Column::Booked, SimpleExpr::from(Expr::col(seat::Column::Booked)))
        .filter(seat::Column::SlotId.eq(slot_id))
        .filter(seat::Column::SeatNumber.is_in(seat_numbers.iter().cloned()))
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(())
}

pub(super) async fn set_booked<C: ConnectionTrait>(
    db: &C,
    seat_ids: &[i32],
    booked: bool,
) -> DomainResult<()> {
    if seat_ids.is_empty() {
        return Ok(());
    }
    seat::Entity::update_many()
        .col_expr(seat::Column::Booked, Expr::value(booked))
        .filter(seat::Column::Id.is_in(seat_ids.iter().copied()))
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(())
}

/// Seat numbers of the slot referenced by a CONFIRMED booking
pub(super) async fn confirmed_seat_numbers<C: ConnectionTrait>(
    db: &C,
    slot_id: i32,
    seat_numbers: &[String],
) -> DomainResult<Vec<String>> {
    if seat_numbers.is_empty() {
        return Ok(Vec::new());
    }

    let rows = booking_seat::Entity::find()
        .inner_join(booking::Entity)
        .filter(booking_seat::Column::SlotId.eq(slot_id))
        .filter(booking_seat::Column::SeatNumber.is_in(seat_numbers.iter().cloned()))
        .filter(booking::Column::Status.eq(BookingStatus::Confirmed.as_str()))
        .all(db)
        .await
        .map_err(db_err)?;

    let mut numbers: Vec<String> = rows.into_iter().map(|r| r.seat_number).collect();
    numbers.sort();
    numbers.dedup();
    Ok(numbers)
}

#[async_trait]
impl SeatRepository for SeaOrmSeatRepository {
    async fn find_by_slot(&self, slot_id: i32) -> DomainResult<Vec<Seat>> {
        let models = seat::Entity::find()
            .filter(seat::Column::SlotId.eq(slot_id))
            .order_by_asc(seat::Column::SeatNumber)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_numbers(
        &self,
        slot_id: i32,
        seat_numbers: &[String],
    ) -> DomainResult<Vec<Seat>> {
        find_seats(&self.db, slot_id, seat_numbers, false).await
    }

    async fn is_in_confirmed_booking(&self, slot_id: i32, seat_number: &str) -> DomainResult<bool> {
        let found =
            confirmed_seat_numbers(&self.db, slot_id, &[seat_number.to_string()]).await?;
        Ok(!found.is_empty())
    }
}

//! SeaORM implementation of SlotRepository

use async_trait::async_trait;
use sea_orm::prelude::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};
use tracing::debug;

use super::db_err;
use crate::domain::slot::{NewSlot, Slot, SlotRepository};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::{movie_slot, seat};

pub struct SeaOrmSlotRepository {
    db: DatabaseConnection,
}

impl SeaOrmSlotRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(super) fn model_to_domain(m: movie_slot::Model) -> Slot {
    Slot {
        id: m.id,
        movie_title: m.movie_title,
        show_date: m.show_date,
        start_time: m.start_time,
        end_time: m.end_time,
        theater_name: m.theater_name,
        screen_type: m.screen_type,
        total_seats: m.total_seats,
        available_seats: m.available_seats,
    }
}

pub(super) async fn find_slot<C: ConnectionTrait>(db: &C, id: i32) -> DomainResult<Option<Slot>> {
    let model = movie_slot::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(db_err)?;
    Ok(model.map(model_to_domain))
}

pub(super) async fn adjust_available<C: ConnectionTrait>(
    db: &C,
    slot_id: i32,
    delta: i32,
) -> DomainResult<()> {
    movie_slot::Entity::update_many()
        .col_expr(
            movie_slot::Column::AvailableSeats,
            Expr::col(movie_slot::Column::AvailableSeats).add(delta),
        )
        .filter(movie_slot::Column::Id.eq(slot_id))
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(())
}

#[async_trait]
impl SlotRepository for SeaOrmSlotRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Slot>> {
        find_slot(&self.db, id).await
    }

    async fn create_with_seats(
        &self,
        slot: NewSlot,
        seats: Vec<(String, f64)>,
    ) -> DomainResult<Slot> {
        debug!(theater = %slot.theater_name, seats = seats.len(), "Creating slot");

        let txn = self.db.begin().await.map_err(db_err)?;
        let count = seats.len() as i32;

        let created = movie_slot::ActiveModel {
            movie_title: Set(slot.movie_title),
            show_date: Set(slot.show_date),
            start_time: Set(slot.start_time),
            end_time: Set(slot.end_time),
            theater_name: Set(slot.theater_name),
            screen_type: Set(slot.screen_type),
            total_seats: Set(count),
            available_seats: Set(count),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        for (seat_number, price) in seats {
            seat::ActiveModel {
                slot_id: Set(created.id),
                seat_number: Set(seat_number),
                price: Set(price),
                booked: Set(false),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;
        Ok(model_to_domain(created))
    }
}

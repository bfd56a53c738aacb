//! Temporary seat lock entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "temporary_seat_locks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub seat_id: i32,
    pub slot_id: i32,
    pub seat_number: String,
    pub session_id: String,
    pub locked_at: DateTimeUtc,
    pub expires_at: DateTimeUtc,
    /// Unique per seat while true (partial index `uq_seat_locks_active_seat`)
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::seat::Entity",
        from = "Column::SeatId",
        to = "super::seat::Column::Id"
    )]
    Seat,
}

impl Related<super::seat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seat.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

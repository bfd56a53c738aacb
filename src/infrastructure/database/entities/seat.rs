//! Seat entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "seats")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub slot_id: i32,
    pub seat_number: String,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    /// Committed state; written only by booking commit and cancellation
    pub booked: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::movie_slot::Entity",
        from = "Column::SlotId",
        to = "super::movie_slot::Column::Id"
    )]
    Slot,
    #[sea_orm(has_many = "super::temporary_seat_lock::Entity")]
    Locks,
}

impl Related<super::movie_slot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Slot.def()
    }
}

impl Related<super::temporary_seat_lock::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Locks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

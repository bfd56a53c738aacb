//! Booking entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub slot_id: i32,
    pub user_email: String,

    /// JSON array of seat numbers in request order
    #[sea_orm(column_type = "Text")]
    pub seat_numbers: String,

    /// CONFIRMED or CANCELLED
    pub status: String,
    /// COMPLETED or REFUNDED
    pub payment_status: String,

    #[sea_orm(nullable)]
    pub payment_id: Option<String>,
    pub payment_method: String,

    /// JSON object returned by the gateway
    #[sea_orm(column_type = "Text", nullable)]
    pub payment_details: Option<String>,

    #[sea_orm(column_type = "Double")]
    pub total_amount: f64,
    pub booking_time: DateTimeUtc,

    // Ticket verification
    #[sea_orm(nullable)]
    pub verification_token: Option<String>,
    #[sea_orm(nullable)]
    pub random_string: Option<String>,
    #[sea_orm(nullable)]
    pub qr_code: Option<String>,
    pub is_verified: bool,
    #[sea_orm(nullable)]
    pub verification_time: Option<DateTimeUtc>,
    #[sea_orm(nullable)]
    pub verified_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::movie_slot::Entity",
        from = "Column::SlotId",
        to = "super::movie_slot::Column::Id"
    )]
    Slot,
    #[sea_orm(has_many = "super::booking_seat::Entity")]
    BookingSeats,
}

impl Related<super::movie_slot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Slot.def()
    }
}

impl Related<super::booking_seat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BookingSeats.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

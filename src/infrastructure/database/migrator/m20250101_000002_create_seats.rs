//! Create seats table
//!
//! Seat numbers are unique within a slot.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_movie_slots::MovieSlots;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Seats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Seats::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Seats::SlotId).integer().not_null())
                    .col(ColumnDef::new(Seats::SeatNumber).string().not_null())
                    .col(ColumnDef::new(Seats::Price).double().not_null())
                    .col(
                        ColumnDef::new(Seats::Booked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_seats_slot")
                            .from(Seats::Table, Seats::SlotId)
                            .to(MovieSlots::Table, MovieSlots::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_seats_slot_number")
                    .table(Seats::Table)
                    .col(Seats::SlotId)
                    .col(Seats::SeatNumber)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Seats::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Seats {
    Table,
    Id,
    SlotId,
    SeatNumber,
    Price,
    Booked,
}

//! Create movie_slots table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MovieSlots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MovieSlots::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MovieSlots::MovieTitle).string().not_null())
                    .col(ColumnDef::new(MovieSlots::ShowDate).date().not_null())
                    .col(ColumnDef::new(MovieSlots::StartTime).time().not_null())
                    .col(ColumnDef::new(MovieSlots::EndTime).time().not_null())
                    .col(ColumnDef::new(MovieSlots::TheaterName).string().not_null())
                    .col(
                        ColumnDef::new(MovieSlots::ScreenType)
                            .string()
                            .not_null()
                            .default("2D"),
                    )
                    .col(
                        ColumnDef::new(MovieSlots::TotalSeats)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MovieSlots::AvailableSeats)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MovieSlots::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum MovieSlots {
    Table,
    Id,
    MovieTitle,
    ShowDate,
    StartTime,
    EndTime,
    TheaterName,
    ScreenType,
    TotalSeats,
    AvailableSeats,
}

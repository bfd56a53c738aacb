//! Create bookings and booking_seats tables

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
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::SlotId).integer().not_null())
                    .col(ColumnDef::new(Bookings::UserEmail).string().not_null())
                    .col(ColumnDef::new(Bookings::SeatNumbers).text().not_null())
                    .col(
                        ColumnDef::new(Bookings::Status)
                            .string()
                            .not_null()
                            .default("CONFIRMED"),
                    )
                    .col(
                        ColumnDef::new(Bookings::PaymentStatus)
                            .string()
                            .not_null()
                            .default("COMPLETED"),
                    )
                    .col(ColumnDef::new(Bookings::PaymentId).string())
                    .col(ColumnDef::new(Bookings::PaymentMethod).string().not_null())
                    .col(ColumnDef::new(Bookings::PaymentDetails).text())
                    .col(ColumnDef::new(Bookings::TotalAmount).double().not_null())
                    .col(
                        ColumnDef::new(Bookings::BookingTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::VerificationToken).string())
                    .col(ColumnDef::new(Bookings::RandomString).string())
                    .col(ColumnDef::new(Bookings::QrCode).string())
                    .col(
                        ColumnDef::new(Bookings::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Bookings::VerificationTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(Bookings::VerifiedBy).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_slot")
                            .from(Bookings::Table, Bookings::SlotId)
                            .to(MovieSlots::Table, MovieSlots::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_user_email")
                    .table(Bookings::Table)
                    .col(Bookings::UserEmail)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BookingSeats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BookingSeats::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BookingSeats::BookingId).integer().not_null())
                    .col(ColumnDef::new(BookingSeats::SlotId).integer().not_null())
                    .col(ColumnDef::new(BookingSeats::SeatNumber).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_seats_booking")
                            .from(BookingSeats::Table, BookingSeats::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_booking_seats_slot_number")
                    .table(BookingSeats::Table)
                    .col(BookingSeats::SlotId)
                    .col(BookingSeats::SeatNumber)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BookingSeats::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Bookings {
    Table,
    Id,
    SlotId,
    UserEmail,
    SeatNumbers,
    Status,
    PaymentStatus,
    PaymentId,
    PaymentMethod,
    PaymentDetails,
    TotalAmount,
    BookingTime,
    VerificationToken,
    RandomString,
    QrCode,
    IsVerified,
    VerificationTime,
    VerifiedBy,
}

#[derive(Iden)]
pub enum BookingSeats {
    Table,
    Id,
    BookingId,
    SlotId,
    SeatNumber,
}

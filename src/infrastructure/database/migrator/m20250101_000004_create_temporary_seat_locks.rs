//! Create temporary_seat_locks table
//!
//! The partial unique index allows any number of released rows per seat
//! but only one with `active` set.

use sea_orm_migration::prelude::*;

use super::m20250101_000002_create_seats::Seats;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TemporarySeatLocks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TemporarySeatLocks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TemporarySeatLocks::SeatId).integer().not_null())
                    .col(ColumnDef::new(TemporarySeatLocks::SlotId).integer().not_null())
                    .col(
                        ColumnDef::new(TemporarySeatLocks::SeatNumber)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TemporarySeatLocks::SessionId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TemporarySeatLocks::LockedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TemporarySeatLocks::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TemporarySeatLocks::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_seat_locks_seat")
                            .from(TemporarySeatLocks::Table, TemporarySeatLocks::SeatId)
                            .to(Seats::Table, Seats::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_seat_locks_session")
                    .table(TemporarySeatLocks::Table)
                    .col(TemporarySeatLocks::SessionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_seat_locks_expires_at")
                    .table(TemporarySeatLocks::Table)
                    .col(TemporarySeatLocks::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        // Partial indexes are not expressible through the index builder.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_seat_locks_active_seat \
                 ON temporary_seat_locks (seat_id) WHERE active",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TemporarySeatLocks::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum TemporarySeatLocks {
    Table,
    Id,
    SeatId,
    SlotId,
    SeatNumber,
    SessionId,
    LockedAt,
    ExpiresAt,
    Active,
}

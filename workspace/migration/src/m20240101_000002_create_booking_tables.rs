use sea_orm_migration::{prelude::*, schema::*};

use crate::m20240101_000001_create_account_tables::{Clients, Photographers, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create bookings table
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(pk_auto(Bookings::Id))
                    .col(integer(Bookings::ClientId))
                    .col(integer(Bookings::PhotographerId))
                    .col(integer(Bookings::ClientProfileId))
                    .col(integer(Bookings::PhotographerProfileId))
                    .col(date(Bookings::EventDate))
                    .col(string_len(Bookings::Location, 255))
                    .col(text(Bookings::Description))
                    .col(boolean(Bookings::IsConfirmed).default(false))
                    .col(string_len(Bookings::Status, 20).default("Pending"))
                    .col(text_null(Bookings::ReasonForDenial))
                    .col(date_time(Bookings::CreatedAt))
                    .col(date_time_null(Bookings::RespondedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_client")
                            .from(Bookings::Table, Bookings::ClientId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_photographer")
                            .from(Bookings::Table, Bookings::PhotographerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_client_profile")
                            .from(Bookings::Table, Bookings::ClientProfileId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_photographer_profile")
                            .from(Bookings::Table, Bookings::PhotographerProfileId)
                            .to(Photographers::Table, Photographers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_status")
                    .table(Bookings::Table)
                    .col(Bookings::Status)
                    .to_owned(),
            )
            .await?;

        // Create notifications table
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(pk_auto(Notifications::Id))
                    .col(integer(Notifications::PhotographerId))
                    .col(integer(Notifications::BookingId))
                    .col(boolean(Notifications::IsRead).default(false))
                    .col(date_time(Notifications::CreatedAt))
                    .col(integer(Notifications::UnansweredCount).default(0))
                    .col(date_time_null(Notifications::LastCheckedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_photographer")
                            .from(Notifications::Table, Notifications::PhotographerId)
                            .to(Photographers::Table, Photographers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_booking")
                            .from(Notifications::Table, Notifications::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create booking_history table
        manager
            .create_table(
                Table::create()
                    .table(BookingHistory::Table)
                    .if_not_exists()
                    .col(pk_auto(BookingHistory::Id))
                    .col(integer(BookingHistory::ClientId))
                    .col(integer(BookingHistory::BookingId))
                    .col(date_time(BookingHistory::CreatedAt))
                    .col(date_time(BookingHistory::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_history_client")
                            .from(BookingHistory::Table, BookingHistory::ClientId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_history_booking")
                            .from(BookingHistory::Table, BookingHistory::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BookingHistory::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Bookings {
    Table,
    Id,
    ClientId,
    PhotographerId,
    ClientProfileId,
    PhotographerProfileId,
    EventDate,
    Location,
    Description,
    IsConfirmed,
    Status,
    ReasonForDenial,
    CreatedAt,
    RespondedAt,
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    Id,
    PhotographerId,
    BookingId,
    IsRead,
    CreatedAt,
    UnansweredCount,
    LastCheckedAt,
}

#[derive(DeriveIden)]
enum BookingHistory {
    Table,
    Id,
    ClientId,
    BookingId,
    CreatedAt,
    UpdatedAt,
}

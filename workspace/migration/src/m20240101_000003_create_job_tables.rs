use sea_orm_migration::{prelude::*, schema::*};

use crate::m20240101_000001_create_account_tables::{Clients, Photographers, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create job_posts table
        manager
            .create_table(
                Table::create()
                    .table(JobPosts::Table)
                    .if_not_exists()
                    .col(pk_auto(JobPosts::Id))
                    .col(integer(JobPosts::ClientId))
                    .col(integer(JobPosts::ClientProfileId))
                    .col(string_len(JobPosts::Title, 255))
                    .col(text(JobPosts::Description))
                    .col(string_len(JobPosts::Location, 255))
                    .col(date(JobPosts::EventDate))
                    .col(date_time(JobPosts::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_post_client")
                            .from(JobPosts::Table, JobPosts::ClientId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_post_client_profile")
                            .from(JobPosts::Table, JobPosts::ClientProfileId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create job_applications table
        manager
            .create_table(
                Table::create()
                    .table(JobApplications::Table)
                    .if_not_exists()
                    .col(pk_auto(JobApplications::Id))
                    .col(integer(JobApplications::JobPostId))
                    .col(integer(JobApplications::PhotographerId))
                    .col(integer(JobApplications::ClientId))
                    .col(text(JobApplications::Message))
                    .col(date_time(JobApplications::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_application_post")
                            .from(JobApplications::Table, JobApplications::JobPostId)
                            .to(JobPosts::Table, JobPosts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_application_photographer")
                            .from(JobApplications::Table, JobApplications::PhotographerId)
                            .to(Photographers::Table, Photographers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_application_client")
                            .from(JobApplications::Table, JobApplications::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One application per photographer and post
        manager
            .create_index(
                Index::create()
                    .name("idx_job_applications_post_photographer")
                    .table(JobApplications::Table)
                    .col(JobApplications::JobPostId)
                    .col(JobApplications::PhotographerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create work_history table
        manager
            .create_table(
                Table::create()
                    .table(WorkHistory::Table)
                    .if_not_exists()
                    .col(pk_auto(WorkHistory::Id))
                    .col(integer(WorkHistory::PhotographerId))
                    .col(date(WorkHistory::StartDate))
                    .col(date_null(WorkHistory::EndDate))
                    .col(string_len(WorkHistory::Position, 100))
                    .col(text(WorkHistory::Description))
                    .col(date_time(WorkHistory::CreatedAt))
                    .col(date_time(WorkHistory::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_history_photographer")
                            .from(WorkHistory::Table, WorkHistory::PhotographerId)
                            .to(Users::Table, Users::Id)
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
            .drop_table(Table::drop().table(WorkHistory::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(JobApplications::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(JobPosts::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum JobPosts {
    Table,
    Id,
    ClientId,
    ClientProfileId,
    Title,
    Description,
    Location,
    EventDate,
    CreatedAt,
}

#[derive(DeriveIden)]
enum JobApplications {
    Table,
    Id,
    JobPostId,
    PhotographerId,
    ClientId,
    Message,
    CreatedAt,
}

#[derive(DeriveIden)]
enum WorkHistory {
    Table,
    Id,
    PhotographerId,
    StartDate,
    EndDate,
    Position,
    Description,
    CreatedAt,
    UpdatedAt,
}

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string_len(Users::Email, 80).unique_key())
                    .col(string_len(Users::Username, 45).unique_key())
                    .col(string(Users::PasswordHash))
                    .col(string_len(Users::FirstName, 80))
                    .col(string_len(Users::LastName, 80))
                    .col(integer(Users::UserType).default(1))
                    .col(boolean(Users::IsActive).default(true))
                    .col(date_time(Users::DateJoined))
                    .col(date_time_null(Users::LastLogin))
                    .to_owned(),
            )
            .await?;

        // Create staff table
        manager
            .create_table(
                Table::create()
                    .table(Staff::Table)
                    .if_not_exists()
                    .col(pk_auto(Staff::Id))
                    .col(integer(Staff::UserId).unique_key())
                    .col(string_len_null(Staff::Phone, 20))
                    .col(string_len_null(Staff::Department, 100))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_staff_user")
                            .from(Staff::Table, Staff::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create photographers table
        manager
            .create_table(
                Table::create()
                    .table(Photographers::Table)
                    .if_not_exists()
                    .col(pk_auto(Photographers::Id))
                    .col(integer(Photographers::UserId).unique_key())
                    .col(integer_null(Photographers::Age))
                    .col(text(Photographers::Bio))
                    .col(string_null(Photographers::PortfolioUrl))
                    .col(string_null(Photographers::SocialLink))
                    .col(string_len(Photographers::AccountNumber, 20))
                    .col(string_len(Photographers::BankName, 100))
                    .col(boolean(Photographers::IsSuspended).default(false))
                    .col(date_time_null(Photographers::SuspendedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_photographer_user")
                            .from(Photographers::Table, Photographers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create clients table
        manager
            .create_table(
                Table::create()
                    .table(Clients::Table)
                    .if_not_exists()
                    .col(pk_auto(Clients::Id))
                    .col(integer(Clients::UserId).unique_key())
                    .col(text_null(Clients::Description))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_client_user")
                            .from(Clients::Table, Clients::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create profiles table
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(pk_auto(Profiles::Id))
                    .col(integer(Profiles::UserId).unique_key())
                    .col(integer(Profiles::ProfileType))
                    .col(string_len_null(Profiles::Phone, 20))
                    .col(string_len_null(Profiles::Location, 50))
                    .col(string_null(Profiles::ImageUrl))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_user")
                            .from(Profiles::Table, Profiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create profile_switches table
        manager
            .create_table(
                Table::create()
                    .table(ProfileSwitches::Table)
                    .if_not_exists()
                    .col(pk_auto(ProfileSwitches::Id))
                    .col(integer(ProfileSwitches::UserId).unique_key())
                    .col(integer(ProfileSwitches::ActiveProfileId))
                    .col(string_len_null(ProfileSwitches::SelectedProfile, 20))
                    .col(text_null(ProfileSwitches::EmailValidationToken))
                    .col(boolean(ProfileSwitches::IsVerified).default(false))
                    .col(date_time_null(ProfileSwitches::RequestedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_switch_user")
                            .from(ProfileSwitches::Table, ProfileSwitches::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_switch_profile")
                            .from(ProfileSwitches::Table, ProfileSwitches::ActiveProfileId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(ProfileSwitches::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Clients::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Photographers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Staff::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    Id,
    Email,
    Username,
    PasswordHash,
    FirstName,
    LastName,
    UserType,
    IsActive,
    DateJoined,
    LastLogin,
}

#[derive(DeriveIden)]
enum Staff {
    Table,
    Id,
    UserId,
    Phone,
    Department,
}

#[derive(DeriveIden)]
pub(crate) enum Photographers {
    Table,
    Id,
    UserId,
    Age,
    Bio,
    PortfolioUrl,
    SocialLink,
    AccountNumber,
    BankName,
    IsSuspended,
    SuspendedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Clients {
    Table,
    Id,
    UserId,
    Description,
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
    UserId,
    ProfileType,
    Phone,
    Location,
    ImageUrl,
}

#[derive(DeriveIden)]
enum ProfileSwitches {
    Table,
    Id,
    UserId,
    ActiveProfileId,
    SelectedProfile,
    EmailValidationToken,
    IsVerified,
    RequestedAt,
}

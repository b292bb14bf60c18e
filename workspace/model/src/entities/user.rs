use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;

/// The role a user account was registered with.
///
/// Stored as the integer codes the rest of the system (and existing clients)
/// already use: `1` staff, `2` photographer, `3` client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum UserType {
    #[sea_orm(num_value = 1)]
    Staff,
    #[sea_orm(num_value = 2)]
    Photographer,
    #[sea_orm(num_value = 3)]
    Client,
}

impl UserType {
    pub fn label(&self) -> &'static str {
        match self {
            UserType::Staff => "Staff",
            UserType::Photographer => "Photographer",
            UserType::Client => "Client",
        }
    }
}

/// Represents a registered account.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: String,
    /// PHC-formatted argon2 hash. Never serialized to clients.
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: UserType,
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    pub date_joined: NaiveDateTime,
    pub last_login: Option<NaiveDateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::staff::Entity")]
    Staff,
    #[sea_orm(has_one = "super::photographer::Entity")]
    Photographer,
    #[sea_orm(has_one = "super::client::Entity")]
    Client,
    #[sea_orm(has_one = "super::profile::Entity")]
    Profile,
    #[sea_orm(has_one = "super::profile_switch::Entity")]
    ProfileSwitch,
    #[sea_orm(has_many = "super::work_history::Entity")]
    WorkHistory,
    #[sea_orm(has_many = "super::booking_history::Entity")]
    BookingHistory,
}

impl Related<super::staff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Staff.def()
    }
}

impl Related<super::photographer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Photographer.def()
    }
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<super::profile_switch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProfileSwitch.def()
    }
}

impl Related<super::work_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

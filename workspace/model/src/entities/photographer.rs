use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;

/// Role details for a photographer account.
///
/// `is_suspended` is flipped by the notification escalation sweep once too
/// many booking notifications went unanswered. Suspended photographers can
/// not receive new bookings.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "photographers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: i32,
    pub age: Option<i32>,
    #[sea_orm(column_type = "Text")]
    pub bio: String,
    pub portfolio_url: Option<String>,
    pub social_link: Option<String>,
    pub account_number: String,
    pub bank_name: String,
    #[sea_orm(default_value = "false")]
    pub is_suspended: bool,
    pub suspended_at: Option<NaiveDateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::notification::Entity")]
    Notification,
    #[sea_orm(has_many = "super::job_application::Entity")]
    JobApplication,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notification.def()
    }
}

impl Related<super::job_application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobApplication.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

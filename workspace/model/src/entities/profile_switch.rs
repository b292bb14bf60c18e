use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;

/// A pending (or completed) request to move a user to the other side of the
/// marketplace. The switch only happens once the emailed token comes back.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "profile_switches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: i32,
    pub active_profile_id: i32,
    /// `"client"` or `"photographer"`, as requested.
    pub selected_profile: Option<String>,
    /// Cleared once used so a link can not be replayed.
    #[sea_orm(column_type = "Text", nullable)]
    pub email_validation_token: Option<String>,
    #[sea_orm(default_value = "false")]
    pub is_verified: bool,
    pub requested_at: Option<NaiveDateTime>,
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
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::ActiveProfileId",
        to = "super::profile::Column::Id",
        on_delete = "Cascade"
    )]
    ActiveProfile,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActiveProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

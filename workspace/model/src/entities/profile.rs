use sea_orm::entity::prelude::*;

/// Which marketplace side a profile currently presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum ProfileType {
    #[sea_orm(num_value = 1)]
    Photographer,
    #[sea_orm(num_value = 2)]
    Client,
}

impl ProfileType {
    /// Parses the lowercase selection used in profile-switch links.
    pub fn from_selection(selection: &str) -> Option<Self> {
        match selection {
            "photographer" => Some(ProfileType::Photographer),
            "client" => Some(ProfileType::Client),
            _ => None,
        }
    }

    pub fn as_selection(&self) -> &'static str {
        match self {
            ProfileType::Photographer => "photographer",
            ProfileType::Client => "client",
        }
    }

    /// The account role that goes with this profile.
    pub fn user_type(&self) -> super::user::UserType {
        match self {
            ProfileType::Photographer => super::user::UserType::Photographer,
            ProfileType::Client => super::user::UserType::Client,
        }
    }
}

/// Public-facing details shared by photographer and client accounts.
/// A user owns at most one profile.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: i32,
    pub profile_type: ProfileType,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
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
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;

/// A photographer's application to a job post. One per photographer and post.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "job_applications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub job_post_id: i32,
    pub photographer_id: i32,
    pub client_id: i32,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::job_post::Entity",
        from = "Column::JobPostId",
        to = "super::job_post::Column::Id",
        on_delete = "Cascade"
    )]
    JobPost,
    #[sea_orm(
        belongs_to = "super::photographer::Entity",
        from = "Column::PhotographerId",
        to = "super::photographer::Column::Id",
        on_delete = "Cascade"
    )]
    Photographer,
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id",
        on_delete = "Cascade"
    )]
    Client,
}

impl Related<super::job_post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobPost.def()
    }
}

impl Related<super::photographer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Photographer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

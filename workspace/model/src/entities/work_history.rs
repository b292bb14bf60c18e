use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::entity::prelude::*;

/// A past engagement listed on a photographer's record.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "work_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// The photographer's user id.
    pub photographer_id: i32,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub position: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// `end`, when set, must not come before `start`.
pub fn is_valid_range(start: NaiveDate, end: Option<NaiveDate>) -> bool {
    end.is_none_or(|end| end >= start)
}

impl Model {
    pub fn has_valid_range(&self) -> bool {
        is_valid_range(self.start_date, self.end_date)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::PhotographerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Photographer,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Photographer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;

/// Tells a photographer about a new booking and counts how many response
/// windows passed without it being read.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub photographer_id: i32,
    pub booking_id: i32,
    #[sea_orm(default_value = "false")]
    pub is_read: bool,
    pub created_at: NaiveDateTime,
    #[sea_orm(default_value = "0")]
    pub unanswered_count: i32,
    pub last_checked_at: Option<NaiveDateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::photographer::Entity",
        from = "Column::PhotographerId",
        to = "super::photographer::Column::Id",
        on_delete = "Cascade"
    )]
    Photographer,
    #[sea_orm(
        belongs_to = "super::booking::Entity",
        from = "Column::BookingId",
        to = "super::booking::Column::Id",
        on_delete = "Cascade"
    )]
    Booking,
}

impl Related<super::photographer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Photographer.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::entity::prelude::*;

/// Lifecycle of a booking request.
///
/// A booking starts `Pending` and is answered exactly once, either by the
/// photographer or by the response timer. Both answers are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum BookingStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Accepted")]
    Accepted,
    #[sea_orm(string_value = "Denied")]
    Denied,
}

impl BookingStatus {
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Accepted)
                | (BookingStatus::Pending, BookingStatus::Denied)
        )
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, BookingStatus::Pending)
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Pending" => Some(BookingStatus::Pending),
            "Accepted" => Some(BookingStatus::Accepted),
            "Denied" => Some(BookingStatus::Denied),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Accepted => "Accepted",
            BookingStatus::Denied => "Denied",
        }
    }
}

/// A client's request to book a photographer for an event.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// The requesting client's user id.
    pub client_id: i32,
    /// The booked photographer's user id.
    pub photographer_id: i32,
    pub client_profile_id: i32,
    pub photographer_profile_id: i32,
    pub event_date: NaiveDate,
    pub location: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(default_value = "false")]
    pub is_confirmed: bool,
    pub status: BookingStatus,
    #[sea_orm(column_type = "Text", nullable)]
    pub reason_for_denial: Option<String>,
    /// Start of the response window.
    pub created_at: NaiveDateTime,
    pub responded_at: Option<NaiveDateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ClientId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Client,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::PhotographerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Photographer,
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientProfileId",
        to = "super::client::Column::Id",
        on_delete = "Cascade"
    )]
    ClientProfile,
    #[sea_orm(
        belongs_to = "super::photographer::Entity",
        from = "Column::PhotographerProfileId",
        to = "super::photographer::Column::Id",
        on_delete = "Cascade"
    )]
    PhotographerProfile,
    #[sea_orm(has_many = "super::notification::Entity")]
    Notification,
    #[sea_orm(has_many = "super::booking_history::Entity")]
    BookingHistory,
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notification.def()
    }
}

impl Related<super::booking_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BookingHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::BookingStatus;

    #[test]
    fn only_pending_bookings_can_be_answered() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Accepted));
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Denied));
        assert!(!BookingStatus::Pending.can_transition_to(BookingStatus::Pending));
        assert!(!BookingStatus::Accepted.can_transition_to(BookingStatus::Denied));
        assert!(!BookingStatus::Denied.can_transition_to(BookingStatus::Accepted));
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert_eq!(BookingStatus::parse("Accepted"), Some(BookingStatus::Accepted));
        assert_eq!(BookingStatus::parse("accepted"), None);
        assert_eq!(BookingStatus::Denied.as_str(), "Denied");
        assert!(BookingStatus::Denied.is_terminal());
    }
}

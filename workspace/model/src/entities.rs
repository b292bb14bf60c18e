//! SeaORM entities for the booking marketplace.
//!
//! Every account is a `user` with exactly one role row (`staff`,
//! `photographer` or `client`) matching its `user_type`. Photographers and
//! clients additionally own a `profile`, which the profile-switch flow
//! moves between the two sides.

pub mod booking;
pub mod booking_history;
pub mod client;
pub mod job_application;
pub mod job_post;
pub mod notification;
pub mod photographer;
pub mod profile;
pub mod profile_switch;
pub mod staff;
pub mod user;
pub mod work_history;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::booking::Entity as Booking;
    pub use super::booking_history::Entity as BookingHistory;
    pub use super::client::Entity as Client;
    pub use super::job_application::Entity as JobApplication;
    pub use super::job_post::Entity as JobPost;
    pub use super::notification::Entity as Notification;
    pub use super::photographer::Entity as Photographer;
    pub use super::profile::Entity as Profile;
    pub use super::profile_switch::Entity as ProfileSwitch;
    pub use super::staff::Entity as Staff;
    pub use super::user::Entity as User;
    pub use super::work_history::Entity as WorkHistory;
}

#[cfg(test)]
mod test {
    use chrono::{NaiveDate, Utc};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, ModelTrait, QueryFilter, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    async fn insert_user(
        db: &DatabaseConnection,
        name: &str,
        user_type: user::UserType,
    ) -> Result<user::Model, DbErr> {
        user::ActiveModel {
            email: Set(format!("{}@example.com", name)),
            username: Set(name.to_string()),
            password_hash: Set("not-a-real-hash".to_string()),
            first_name: Set(name.to_string()),
            last_name: Set("Tester".to_string()),
            user_type: Set(user_type),
            is_active: Set(true),
            date_joined: Set(Utc::now().naive_utc()),
            last_login: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let now = Utc::now().naive_utc();

        let client_user = insert_user(&db, "carla", user::UserType::Client).await?;
        let photographer_user = insert_user(&db, "pavel", user::UserType::Photographer).await?;

        let client_row = client::ActiveModel {
            user_id: Set(client_user.id),
            description: Set(Some("Wedding planner".to_string())),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let photographer_row = photographer::ActiveModel {
            user_id: Set(photographer_user.id),
            age: Set(Some(31)),
            bio: Set("Weddings and portraits".to_string()),
            portfolio_url: Set(None),
            social_link: Set(None),
            account_number: Set("0012345678".to_string()),
            bank_name: Set("First Bank".to_string()),
            is_suspended: Set(false),
            suspended_at: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let booking_row = booking::ActiveModel {
            client_id: Set(client_user.id),
            photographer_id: Set(photographer_user.id),
            client_profile_id: Set(client_row.id),
            photographer_profile_id: Set(photographer_row.id),
            event_date: Set(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
            location: Set("Lagos".to_string()),
            description: Set("Outdoor ceremony".to_string()),
            is_confirmed: Set(false),
            status: Set(booking::BookingStatus::Pending),
            reason_for_denial: Set(None),
            created_at: Set(now),
            responded_at: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        notification::ActiveModel {
            photographer_id: Set(photographer_row.id),
            booking_id: Set(booking_row.id),
            is_read: Set(false),
            created_at: Set(now),
            unanswered_count: Set(0),
            last_checked_at: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let stored = Booking::find_by_id(booking_row.id).one(&db).await?.unwrap();
        assert_eq!(stored.status, booking::BookingStatus::Pending);
        assert_eq!(stored.location, "Lagos");

        let notifications = booking_row.find_related(Notification).all(&db).await?;
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].unanswered_count, 0);

        let found_type = User::find()
            .filter(user::Column::Username.eq("pavel"))
            .one(&db)
            .await?
            .map(|u| u.user_type);
        assert_eq!(found_type, Some(user::UserType::Photographer));

        // Deleting the photographer's account cascades to the booking and
        // its notification.
        User::delete_by_id(photographer_user.id).exec(&db).await?;
        assert!(Booking::find_by_id(booking_row.id).one(&db).await?.is_none());
        assert!(Notification::find().all(&db).await?.is_empty());
        assert!(Photographer::find().all(&db).await?.is_empty());
        assert_eq!(Client::find().all(&db).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_profile_is_unique_per_user() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let owner = insert_user(&db, "olu", user::UserType::Client).await?;

        profile::ActiveModel {
            user_id: Set(owner.id),
            profile_type: Set(profile::ProfileType::Client),
            phone: Set(None),
            location: Set(Some("Abuja".to_string())),
            image_url: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let duplicate = profile::ActiveModel {
            user_id: Set(owner.id),
            profile_type: Set(profile::ProfileType::Photographer),
            phone: Set(None),
            location: Set(None),
            image_url: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await;
        assert!(duplicate.is_err());

        let profiles = Profile::find().all(&db).await?;
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].profile_type, profile::ProfileType::Client);
        Ok(())
    }

    #[tokio::test]
    async fn test_work_history_range() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let shooter = insert_user(&db, "ada", user::UserType::Photographer).await?;
        let now = Utc::now().naive_utc();

        let entry = work_history::ActiveModel {
            photographer_id: Set(shooter.id),
            start_date: Set(NaiveDate::from_ymd_opt(2023, 3, 1).unwrap()),
            end_date: Set(Some(NaiveDate::from_ymd_opt(2023, 2, 1).unwrap())),
            position: Set("Second shooter".to_string()),
            description: Set(String::new()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        assert!(!entry.has_valid_range());
        let open_ended = work_history::Model { end_date: None, ..entry };
        assert!(open_ended.has_valid_range());

        let day = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap();
        assert!(work_history::is_valid_range(day, Some(day)));
        assert!(work_history::is_valid_range(day, None));
        assert!(!work_history::is_valid_range(day, day.pred_opt()));

        let listed = WorkHistory::find()
            .filter(work_history::Column::PhotographerId.eq(shooter.id))
            .all(&db)
            .await?;
        assert_eq!(listed.len(), 1);
        Ok(())
    }
}

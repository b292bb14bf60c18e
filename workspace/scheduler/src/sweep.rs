use chrono::NaiveDateTime;
use model::entities::{booking, notification, photographer};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};
use tracing::{debug, info, instrument, trace, warn};

use crate::error::{Result, SchedulerError};
use crate::policy::TimerPolicy;

/// What a single sweep pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub declined_bookings: Vec<i32>,
    pub escalated_notifications: Vec<i32>,
    pub suspended_photographers: Vec<i32>,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.declined_bookings.is_empty()
            && self.escalated_notifications.is_empty()
            && self.suspended_photographers.is_empty()
    }
}

/// Applies [`TimerPolicy`] to the database.
#[derive(Debug, Clone)]
pub struct Sweeper {
    policy: TimerPolicy,
}

impl Sweeper {
    pub fn new(policy: TimerPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &TimerPolicy {
        &self.policy
    }

    /// Runs both timers once. Repeating a pass with the same `now` changes
    /// nothing further.
    #[instrument(skip(self, db))]
    pub async fn run_once(&self, db: &DatabaseConnection, now: NaiveDateTime) -> Result<SweepReport> {
        let mut report = SweepReport {
            declined_bookings: self.decline_expired_bookings(db, now).await?,
            ..Default::default()
        };

        let (escalated, suspended) = self.escalate_unanswered_notifications(db, now).await?;
        report.escalated_notifications = escalated;
        report.suspended_photographers = suspended;

        if report.is_empty() {
            trace!("Sweep found nothing to do");
        } else {
            info!(
                "Sweep declined {} bookings, escalated {} notifications, suspended {} photographers",
                report.declined_bookings.len(),
                report.escalated_notifications.len(),
                report.suspended_photographers.len()
            );
        }
        Ok(report)
    }

    /// Declines every pending booking whose response window has closed.
    pub async fn decline_expired_bookings(
        &self,
        db: &DatabaseConnection,
        now: NaiveDateTime,
    ) -> Result<Vec<i32>> {
        let pending = booking::Entity::find()
            .filter(booking::Column::Status.eq(booking::BookingStatus::Pending))
            .all(db)
            .await?;
        debug!("Checking {} pending bookings", pending.len());

        let reason = self.policy.decline_reason();
        let mut declined = Vec::new();
        for expired in pending
            .into_iter()
            .filter(|b| self.policy.booking_expired(b, now))
        {
            // Guarded on status so a photographer answering concurrently wins.
            let result = booking::Entity::update_many()
                .col_expr(
                    booking::Column::Status,
                    Expr::value(booking::BookingStatus::Denied),
                )
                .col_expr(
                    booking::Column::ReasonForDenial,
                    Expr::value(Some(reason.clone())),
                )
                .col_expr(booking::Column::RespondedAt, Expr::value(Some(now)))
                .filter(booking::Column::Id.eq(expired.id))
                .filter(booking::Column::Status.eq(booking::BookingStatus::Pending))
                .exec(db)
                .await?;

            if result.rows_affected > 0 {
                info!("Booking {} auto-declined after response window", expired.id);
                declined.push(expired.id);
            } else {
                debug!("Booking {} was answered before it could be declined", expired.id);
            }
        }
        Ok(declined)
    }

    /// Counts a missed window on every due notification and suspends
    /// photographers whose count reaches the threshold.
    ///
    /// Returns the escalated notification ids and the newly suspended
    /// photographer (role row) ids.
    pub async fn escalate_unanswered_notifications(
        &self,
        db: &DatabaseConnection,
        now: NaiveDateTime,
    ) -> Result<(Vec<i32>, Vec<i32>)> {
        let unread = notification::Entity::find()
            .filter(notification::Column::IsRead.eq(false))
            .all(db)
            .await?;
        debug!("Checking {} unread notifications", unread.len());

        let mut escalated = Vec::new();
        let mut suspended = Vec::new();
        for due in unread
            .into_iter()
            .filter(|n| self.policy.notification_due(n, now))
        {
            let txn = db.begin().await?;

            let count = due.unanswered_count + 1;
            let result = notification::Entity::update_many()
                .col_expr(notification::Column::UnansweredCount, Expr::value(count))
                .col_expr(notification::Column::LastCheckedAt, Expr::value(Some(now)))
                .filter(notification::Column::Id.eq(due.id))
                .filter(notification::Column::IsRead.eq(false))
                .filter(notification::Column::UnansweredCount.eq(due.unanswered_count))
                .exec(&txn)
                .await?;

            if result.rows_affected == 0 {
                debug!("Notification {} changed during the sweep, skipping", due.id);
                txn.rollback().await?;
                continue;
            }
            escalated.push(due.id);
            debug!("Notification {} unanswered count is now {}", due.id, count);

            if self.policy.should_suspend(count) {
                let shooter = photographer::Entity::find_by_id(due.photographer_id)
                    .one(&txn)
                    .await?
                    .ok_or(SchedulerError::MissingPhotographer(due.photographer_id))?;

                if !shooter.is_suspended {
                    let mut active: photographer::ActiveModel = shooter.into();
                    active.is_suspended = Set(true);
                    active.suspended_at = Set(Some(now));
                    active.update(&txn).await?;

                    warn!(
                        "Photographer {} suspended after {} unanswered response windows",
                        due.photographer_id, count
                    );
                    suspended.push(due.photographer_id);
                }
            }

            txn.commit().await?;
        }
        Ok((escalated, suspended))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta};
    use migration::{Migrator, MigratorTrait};
    use model::entities::{client, user};
    use sea_orm::Database;

    struct Fixture {
        db: DatabaseConnection,
        photographer_id: i32,
        client_user_id: i32,
        photographer_user_id: i32,
        client_profile_id: i32,
    }

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    async fn insert_user(db: &DatabaseConnection, name: &str, user_type: user::UserType) -> user::Model {
        user::ActiveModel {
            email: Set(format!("{}@example.com", name)),
            username: Set(name.to_string()),
            password_hash: Set("x".to_string()),
            first_name: Set(name.to_string()),
            last_name: Set("Test".to_string()),
            user_type: Set(user_type),
            is_active: Set(true),
            date_joined: Set(t0()),
            last_login: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("insert user")
    }

    async fn setup() -> Fixture {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");

        let client_user = insert_user(&db, "client", user::UserType::Client).await;
        let photographer_user = insert_user(&db, "shooter", user::UserType::Photographer).await;

        let client_row = client::ActiveModel {
            user_id: Set(client_user.id),
            description: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await
        .expect("insert client");

        let photographer_row = photographer::ActiveModel {
            user_id: Set(photographer_user.id),
            age: Set(None),
            bio: Set(String::new()),
            portfolio_url: Set(None),
            social_link: Set(None),
            account_number: Set("1".to_string()),
            bank_name: Set("Bank".to_string()),
            is_suspended: Set(false),
            suspended_at: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await
        .expect("insert photographer");

        Fixture {
            db,
            photographer_id: photographer_row.id,
            client_user_id: client_user.id,
            photographer_user_id: photographer_user.id,
            client_profile_id: client_row.id,
        }
    }

    async fn book(fx: &Fixture, created_at: NaiveDateTime, status: booking::BookingStatus) -> booking::Model {
        booking::ActiveModel {
            client_id: Set(fx.client_user_id),
            photographer_id: Set(fx.photographer_user_id),
            client_profile_id: Set(fx.client_profile_id),
            photographer_profile_id: Set(fx.photographer_id),
            event_date: Set(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()),
            location: Set("Park".to_string()),
            description: Set("Family photos".to_string()),
            is_confirmed: Set(false),
            status: Set(status),
            reason_for_denial: Set(None),
            created_at: Set(created_at),
            responded_at: Set(None),
            ..Default::default()
        }
        .insert(&fx.db)
        .await
        .expect("insert booking")
    }

    async fn notify(fx: &Fixture, booking_id: i32, created_at: NaiveDateTime) -> notification::Model {
        notification::ActiveModel {
            photographer_id: Set(fx.photographer_id),
            booking_id: Set(booking_id),
            is_read: Set(false),
            created_at: Set(created_at),
            unanswered_count: Set(0),
            last_checked_at: Set(None),
            ..Default::default()
        }
        .insert(&fx.db)
        .await
        .expect("insert notification")
    }

    #[tokio::test]
    async fn declines_only_expired_pending_bookings() {
        let fx = setup().await;
        let sweeper = Sweeper::new(TimerPolicy::default());

        let stale = book(&fx, t0(), booking::BookingStatus::Pending).await;
        let fresh = book(&fx, t0() + TimeDelta::hours(20), booking::BookingStatus::Pending).await;
        let accepted = book(&fx, t0(), booking::BookingStatus::Accepted).await;

        let now = t0() + TimeDelta::hours(25);
        let declined = sweeper.decline_expired_bookings(&fx.db, now).await.unwrap();
        assert_eq!(declined, vec![stale.id]);

        let stale = booking::Entity::find_by_id(stale.id).one(&fx.db).await.unwrap().unwrap();
        assert_eq!(stale.status, booking::BookingStatus::Denied);
        assert_eq!(stale.reason_for_denial.as_deref(), Some("24-hour review period expired"));
        assert_eq!(stale.responded_at, Some(now));

        let fresh = booking::Entity::find_by_id(fresh.id).one(&fx.db).await.unwrap().unwrap();
        assert_eq!(fresh.status, booking::BookingStatus::Pending);
        let accepted = booking::Entity::find_by_id(accepted.id).one(&fx.db).await.unwrap().unwrap();
        assert_eq!(accepted.status, booking::BookingStatus::Accepted);

        // Same instant again: nothing left to decline.
        let again = sweeper.decline_expired_bookings(&fx.db, now).await.unwrap();
        assert!(again.is_empty());
    }

    #[tokio::test]
    async fn suspends_after_three_missed_windows() {
        let fx = setup().await;
        let sweeper = Sweeper::new(TimerPolicy::default());
        let b = book(&fx, t0(), booking::BookingStatus::Pending).await;
        let n = notify(&fx, b.id, t0()).await;

        for day in 1..=2 {
            let report = sweeper.run_once(&fx.db, t0() + TimeDelta::days(day)).await.unwrap();
            assert_eq!(report.escalated_notifications, vec![n.id]);
            assert!(report.suspended_photographers.is_empty());
        }

        let report = sweeper.run_once(&fx.db, t0() + TimeDelta::days(3)).await.unwrap();
        assert_eq!(report.suspended_photographers, vec![fx.photographer_id]);

        let stored = notification::Entity::find_by_id(n.id).one(&fx.db).await.unwrap().unwrap();
        assert_eq!(stored.unanswered_count, 3);

        let shooter = photographer::Entity::find_by_id(fx.photographer_id)
            .one(&fx.db)
            .await
            .unwrap()
            .unwrap();
        assert!(shooter.is_suspended);
        assert_eq!(shooter.suspended_at, Some(t0() + TimeDelta::days(3)));

        // A fourth window counts but does not report a second suspension.
        let report = sweeper.run_once(&fx.db, t0() + TimeDelta::days(4)).await.unwrap();
        assert_eq!(report.escalated_notifications, vec![n.id]);
        assert!(report.suspended_photographers.is_empty());
    }

    #[tokio::test]
    async fn repeated_pass_at_same_instant_is_idempotent() {
        let fx = setup().await;
        let sweeper = Sweeper::new(TimerPolicy::default());
        let b = book(&fx, t0(), booking::BookingStatus::Pending).await;
        notify(&fx, b.id, t0()).await;

        let now = t0() + TimeDelta::hours(24);
        let first = sweeper.run_once(&fx.db, now).await.unwrap();
        assert_eq!(first.declined_bookings, vec![b.id]);
        assert_eq!(first.escalated_notifications.len(), 1);

        let second = sweeper.run_once(&fx.db, now).await.unwrap();
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn read_notifications_are_left_alone() {
        let fx = setup().await;
        let sweeper = Sweeper::new(TimerPolicy::default());
        let b = book(&fx, t0(), booking::BookingStatus::Accepted).await;
        let n = notify(&fx, b.id, t0()).await;

        let mut read: notification::ActiveModel = n.into();
        read.is_read = Set(true);
        let n = read.update(&fx.db).await.unwrap();

        let report = sweeper.run_once(&fx.db, t0() + TimeDelta::days(10)).await.unwrap();
        assert!(report.is_empty());

        let stored = notification::Entity::find_by_id(n.id).one(&fx.db).await.unwrap().unwrap();
        assert_eq!(stored.unanswered_count, 0);
    }
}

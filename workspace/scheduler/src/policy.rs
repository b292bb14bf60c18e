use chrono::{NaiveDateTime, TimeDelta};
use model::entities::{booking, notification};

/// Default time a photographer has to answer a booking.
pub const DEFAULT_RESPONSE_WINDOW_HOURS: i64 = 24;

/// Default number of missed windows before a photographer is suspended.
pub const DEFAULT_SUSPENSION_THRESHOLD: i32 = 3;

/// Timing rules applied by the sweep. All decisions are pure functions of
/// the record and the supplied `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerPolicy {
    pub response_window: TimeDelta,
    pub suspension_threshold: i32,
}

impl Default for TimerPolicy {
    fn default() -> Self {
        Self {
            response_window: TimeDelta::hours(DEFAULT_RESPONSE_WINDOW_HOURS),
            suspension_threshold: DEFAULT_SUSPENSION_THRESHOLD,
        }
    }
}

impl TimerPolicy {
    pub fn new(response_window_hours: i64, suspension_threshold: i32) -> Self {
        Self {
            response_window: TimeDelta::hours(response_window_hours),
            suspension_threshold,
        }
    }

    /// Whether `now` still falls inside the booking's response window.
    pub fn within_response_window(&self, booking: &booking::Model, now: NaiveDateTime) -> bool {
        now < booking.created_at + self.response_window
    }

    /// A pending booking whose window has closed.
    pub fn booking_expired(&self, booking: &booking::Model, now: NaiveDateTime) -> bool {
        booking.status == booking::BookingStatus::Pending
            && !self.within_response_window(booking, now)
    }

    /// An unread notification that has gone a full window since it was
    /// created or last counted.
    pub fn notification_due(&self, notification: &notification::Model, now: NaiveDateTime) -> bool {
        if notification.is_read {
            return false;
        }
        let since = notification
            .last_checked_at
            .unwrap_or(notification.created_at);
        since + self.response_window <= now
    }

    pub fn should_suspend(&self, unanswered_count: i32) -> bool {
        unanswered_count >= self.suspension_threshold
    }

    /// Reason stored on bookings the timer declines.
    pub fn decline_reason(&self) -> String {
        format!(
            "{}-hour review period expired",
            self.response_window.num_hours()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use model::entities::booking::BookingStatus;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn booking(status: BookingStatus, created_at: NaiveDateTime) -> booking::Model {
        booking::Model {
            id: 1,
            client_id: 1,
            photographer_id: 2,
            client_profile_id: 1,
            photographer_profile_id: 1,
            event_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            location: "Studio".to_string(),
            description: "Headshots".to_string(),
            is_confirmed: false,
            status,
            reason_for_denial: None,
            created_at,
            responded_at: None,
        }
    }

    fn notification(is_read: bool, last_checked_at: Option<NaiveDateTime>) -> notification::Model {
        notification::Model {
            id: 1,
            photographer_id: 1,
            booking_id: 1,
            is_read,
            created_at: at(0),
            unanswered_count: 0,
            last_checked_at,
        }
    }

    #[test]
    fn pending_booking_expires_exactly_at_window_end() {
        let policy = TimerPolicy::default();
        let created = at(0);
        let pending = booking(BookingStatus::Pending, created);

        assert!(!policy.booking_expired(&pending, created + TimeDelta::hours(23)));
        assert!(policy.booking_expired(&pending, created + TimeDelta::hours(24)));
        assert!(policy.booking_expired(&pending, created + TimeDelta::hours(30)));
    }

    #[test]
    fn answered_bookings_never_expire() {
        let policy = TimerPolicy::default();
        let late = at(0) + TimeDelta::days(5);

        assert!(!policy.booking_expired(&booking(BookingStatus::Accepted, at(0)), late));
        assert!(!policy.booking_expired(&booking(BookingStatus::Denied, at(0)), late));
    }

    #[test]
    fn notification_due_counts_from_last_check() {
        let policy = TimerPolicy::default();
        let fresh = notification(false, None);
        assert!(!policy.notification_due(&fresh, at(12)));
        assert!(policy.notification_due(&fresh, at(0) + TimeDelta::hours(24)));

        let checked = notification(false, Some(at(0) + TimeDelta::hours(24)));
        assert!(!policy.notification_due(&checked, at(0) + TimeDelta::hours(30)));
        assert!(policy.notification_due(&checked, at(0) + TimeDelta::hours(48)));
    }

    #[test]
    fn read_notifications_are_never_due() {
        let policy = TimerPolicy::default();
        let read = notification(true, None);
        assert!(!policy.notification_due(&read, at(0) + TimeDelta::days(10)));
    }

    #[test]
    fn suspension_threshold() {
        let policy = TimerPolicy::new(24, 3);
        assert!(!policy.should_suspend(2));
        assert!(policy.should_suspend(3));
        assert!(policy.should_suspend(4));
    }

    #[test]
    fn decline_reason_names_window() {
        assert_eq!(
            TimerPolicy::default().decline_reason(),
            "24-hour review period expired"
        );
        assert_eq!(
            TimerPolicy::new(48, 3).decline_reason(),
            "48-hour review period expired"
        );
    }
}

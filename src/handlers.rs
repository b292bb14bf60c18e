pub mod auth;
pub mod booking_history;
pub mod bookings;
pub mod health;
pub mod jobs;
pub mod notifications;
pub mod profiles;
pub mod users;
pub mod work_history;

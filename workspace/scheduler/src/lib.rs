//! Booking-response timer.
//!
//! Photographers have one response window (24 hours by default) to answer a
//! booking. A periodic sweep declines bookings nobody answered and counts,
//! per notification, how many windows passed without the photographer
//! reading it. Reaching the suspension threshold suspends the photographer.

pub mod error;
pub mod policy;
pub mod runner;
pub mod sweep;

pub use error::{Result, SchedulerError};
pub use policy::TimerPolicy;
pub use runner::spawn_sweeper;
pub use sweep::{SweepReport, Sweeper};

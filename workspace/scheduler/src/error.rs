use thiserror::Error;

/// Error types for the scheduler
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A notification points at a photographer row that no longer exists
    #[error("Photographer {0} not found")]
    MissingPhotographer(i32),
}

/// Type alias for Result with SchedulerError
pub type Result<T> = std::result::Result<T, SchedulerError>;

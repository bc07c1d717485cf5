use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur within the schedule subsystem.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Underlying SQLite / rusqlite error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The referenced row no longer exists in the store.
    #[error("Schedule entry not found: {id}")]
    NotFound { id: i64 },

    /// An entry for this (user, day) already exists.
    #[error("Schedule entry already exists for user {user_id} on {day}")]
    ConstraintViolation { user_id: i64, day: NaiveDate },

    /// Range bounds were supplied in the wrong order.
    #[error("Start date must precede end ({start} > {end})")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

pub type Result<T> = std::result::Result<T, ScheduleError>;

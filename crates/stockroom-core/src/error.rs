use thiserror::Error;

use crate::models::ItemId;
use crate::pool::PoolError;
use crate::validation::ValidationErrors;

/// Application-wide error types.
///
/// This enum represents all possible errors that can occur in Stockroom.
/// It uses the `thiserror` crate for ergonomic error handling and automatic
/// conversion from underlying library errors.
///
/// # Error Conversion
///
/// Most errors automatically convert from their source types using the `#[from]` attribute:
/// - `sqlx::Error` → `AppError::DatabaseError`
/// - [`PoolError`] → `AppError::WorkerPool`
/// - [`ValidationErrors`] → `AppError::Validation`
///
/// # Examples
///
/// ```no_run
/// use stockroom_core::error::AppError;
///
/// fn example() -> Result<(), AppError> {
///     Err(AppError::ItemNotFound(42))
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Database operation failed.
    ///
    /// This error wraps all errors from SQLx database operations, including
    /// connection failures, query errors, and constraint violations.
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// Item not found in storage.
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    /// Item payload violated one or more field constraints.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The worker pool refused or lost a unit of work.
    #[error("Worker pool error: {0}")]
    WorkerPool(#[from] PoolError),

    /// Configuration value is missing or out of range.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic application error for cases not covered by specific variants.
    ///
    /// Use this sparingly - prefer creating specific error variants
    /// for better error handling and debugging.
    #[error("Error: {0}")]
    Generic(String),
}

impl AppError {
    /// Returns true if the error is about a missing item rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::ItemNotFound(_) | AppError::DatabaseError(sqlx::Error::RowNotFound)
        )
    }
}

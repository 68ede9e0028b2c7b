//! Unified error handling.
//!
//! Provides a single error type for the repository, the listing engine and
//! the CLI. Storage details are logged, never shown to callers.

use domain::DomainError;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Authorization
    #[error("Access denied")]
    Forbidden,

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("{0} already exists")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("Malformed value: {0}")]
    Format(String),

    // Storage errors
    #[cfg(feature = "database")]
    #[error("Storage error")]
    Storage(#[from] sea_orm::DbErr),

    /// Storage failure while executing a listing query
    #[cfg(feature = "database")]
    #[error("Query error")]
    Query(#[source] sea_orm::DbErr),
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Forbidden => "FORBIDDEN",
            AppError::NotFound => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Format(_) => "FORMAT_ERROR",
            #[cfg(feature = "database")]
            AppError::Storage(_) => "STORAGE_ERROR",
            #[cfg(feature = "database")]
            AppError::Query(_) => "QUERY_ERROR",
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Format(_) => self.to_string(),
            AppError::Conflict(msg) => {
                if msg.ends_with("already exists") {
                    msg.clone()
                } else {
                    format!("{} already exists", msg)
                }
            }

            #[cfg(feature = "database")]
            AppError::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                if self.is_unique_violation() {
                    "A record with the same username or email already exists".to_string()
                } else {
                    "A storage error occurred".to_string()
                }
            }
            #[cfg(feature = "database")]
            AppError::Query(e) => {
                tracing::error!("Query error: {:?}", e);
                "The listing query could not be executed".to_string()
            }

            _ => self.to_string(),
        }
    }

    /// Whether this is a storage failure caused by a unique constraint
    pub fn is_unique_violation(&self) -> bool {
        match self {
            #[cfg(feature = "database")]
            AppError::Storage(e) | AppError::Query(e) => matches!(
                e.sql_err(),
                Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
            ),
            _ => false,
        }
    }

    /// Reclassify a storage failure as a listing query failure.
    pub fn into_query_error(self) -> Self {
        match self {
            #[cfg(feature = "database")]
            AppError::Storage(e) => AppError::Query(e),
            other => other,
        }
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::Format(msg) => AppError::Format(msg),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }
}

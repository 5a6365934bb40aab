//! Error types for Pantry.

use thiserror::Error;

/// Common error type for Pantry operations.
///
/// The first four variants form the API-visible contract: validation and
/// conflict failures happen before any write, auth failures are surfaced
/// uniformly to avoid account enumeration, and "not found" covers both a
/// genuinely absent record and a record owned by someone else.
#[derive(Error, Debug)]
pub enum PantryError {
    /// Malformed or missing input. No mutation has been performed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Uniqueness violation, e.g. a duplicate email address.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Bad credential or invalid/missing session.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Record absent, or present but not owned by the caller.
    #[error("{0} not found")]
    NotFound(String),

    /// Database error.
    ///
    /// Wraps errors from sqlx; treated as unrecoverable for the request.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error (blob storage, log files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for PantryError {
    fn from(e: sqlx::Error) -> Self {
        PantryError::Database(e.to_string())
    }
}

/// Result type alias for Pantry operations.
pub type Result<T> = std::result::Result<T, PantryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = PantryError::Validation("email and password are required".to_string());
        assert_eq!(
            err.to_string(),
            "validation error: email and password are required"
        );
    }

    #[test]
    fn test_auth_error_display() {
        let err = PantryError::Auth("email or password is invalid".to_string());
        assert_eq!(
            err.to_string(),
            "authentication error: email or password is invalid"
        );
    }

    #[test]
    fn test_not_found_display() {
        let err = PantryError::NotFound("recipe".to_string());
        assert_eq!(err.to_string(), "recipe not found");
    }

    #[test]
    fn test_conflict_display() {
        let err = PantryError::Conflict("email is already in use".to_string());
        assert_eq!(err.to_string(), "conflict: email is already in use");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PantryError = io_err.into();
        assert!(matches!(err, PantryError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        assert_eq!(sample_ok().unwrap(), 42);
    }
}

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::fmt::Display;
use thiserror::Error;

const UNKNOWN_OPERATION: &str = "unknown";

/// Errors raised while bringing the database up.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("cannot init database pool : {0}")]
    Pool(String),
    #[error("cannot run database migrations : {0}")]
    Migration(String),
}

/// Store error carrying the operation it happened in.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to get connection from pool for operation '{operation}': {message}")]
    PoolError { operation: String, message: String },

    #[error("Database interaction failed for operation '{operation}': {message}")]
    InteractionError { operation: String, message: String },

    #[error("Record not found in operation '{operation}'")]
    NotFound { operation: String },

    #[error("Database query error in operation '{operation}': {message}")]
    QueryError { operation: String, message: String },

    #[error("Unique constraint violation in operation '{operation}': {message}")]
    UniqueViolation { operation: String, message: String },
}

impl DatabaseError {
    pub fn not_found(operation: impl Display) -> Self {
        Self::NotFound {
            operation: operation.to_string(),
        }
    }

    pub fn unique_violation(operation: impl Display, message: impl Display) -> Self {
        Self::UniqueViolation {
            operation: operation.to_string(),
            message: message.to_string(),
        }
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub const fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }

    pub fn operation(&self) -> &str {
        match self {
            Self::PoolError { operation, .. }
            | Self::InteractionError { operation, .. }
            | Self::NotFound { operation }
            | Self::QueryError { operation, .. }
            | Self::UniqueViolation { operation, .. } => operation,
        }
    }

    /// Replaces the placeholder operation left by `From<DieselError>`.
    #[must_use]
    pub fn with_operation(mut self, context: &str) -> Self {
        match &mut self {
            Self::PoolError { operation, .. }
            | Self::InteractionError { operation, .. }
            | Self::NotFound { operation }
            | Self::QueryError { operation, .. }
            | Self::UniqueViolation { operation, .. } => {
                if operation == UNKNOWN_OPERATION {
                    context.clone_into(operation);
                }
            }
        }
        self
    }
}

impl From<DieselError> for DatabaseError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::not_found(UNKNOWN_OPERATION),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::unique_violation(UNKNOWN_OPERATION, info.message())
            }
            other => Self::QueryError {
                operation: UNKNOWN_OPERATION.to_string(),
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diesel_not_found_gets_operation() {
        let err = DatabaseError::from(DieselError::NotFound).with_operation("find wallet 0xabc");
        assert!(err.is_not_found());
        assert_eq!(err.operation(), "find wallet 0xabc");
    }

    #[test]
    fn test_with_operation_keeps_existing_context() {
        let err = DatabaseError::unique_violation("create wallet", "duplicate key")
            .with_operation("something else");
        assert!(err.is_unique_violation());
        assert_eq!(err.operation(), "create wallet");
    }
}

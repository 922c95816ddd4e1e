//! Global application error types.
//!
//! `StoreError` is what the persistence layer reports; `ServiceError` is the
//! taxonomy the authentication core and the user service surface to their
//! callers. Domain failures carry deliberately terse messages so that nothing
//! about the stored state leaks through them.

use thiserror::Error;

/// Errors reported by the user and session stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A conditional write found no row to act on.
    #[error("{entity} not found: {identifier}")]
    NotFound { entity: String, identifier: String },

    /// A unique key was already taken.
    #[error("{entity} already exists: {identifier}")]
    Conflict { entity: String, identifier: String },

    #[error("Database error: {source}")]
    Database {
        #[from]
        source: sqlx::Error,
    },
}

impl StoreError {
    pub fn not_found(entity: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            identifier: identifier.into(),
        }
    }

    pub fn conflict(entity: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::Conflict {
            entity: entity.into(),
            identifier: identifier.into(),
        }
    }

    /// Maps a raw sqlx error, turning unique-constraint violations into `Conflict`.
    pub fn from_write(
        error: sqlx::Error,
        entity: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        match error.as_database_error() {
            Some(db_error) if db_error.is_unique_violation() => {
                Self::conflict(entity, identifier)
            }
            _ => Self::Database { source: error },
        }
    }
}

/// Service-level error shared by the authentication core and user management.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("email already registered")]
    DuplicateEmail,

    /// Raised for both an unknown email and a wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid refresh token")]
    InvalidRefreshToken,

    #[error("refresh token expired")]
    ExpiredRefreshToken,

    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    ExpiredToken,

    #[error("missing authorization header")]
    MissingCredential,

    #[error("invalid authorization header")]
    MalformedCredential,

    #[error("{entity} not found: {identifier}")]
    NotFound { entity: String, identifier: String },

    #[error("Password hashing failed: {message}")]
    Hashing { message: String },

    #[error("Token signing failed: {message}")]
    Signing { message: String },

    /// A configured value cannot be applied, such as a lifetime past the calendar range.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Store error: {source}")]
    Store {
        #[from]
        source: StoreError,
    },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            identifier: identifier.into(),
        }
    }

    pub fn hashing(message: impl Into<String>) -> Self {
        Self::Hashing {
            message: message.into(),
        }
    }

    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// True for failures that indicate a server fault rather than a bad request.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Hashing { .. }
                | Self::Signing { .. }
                | Self::Configuration { .. }
                | Self::Store { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_errors_share_one_message() {
        assert_eq!(
            ServiceError::InvalidCredentials.to_string(),
            "invalid credentials"
        );
        assert!(!ServiceError::InvalidCredentials.is_internal());
    }

    #[test]
    fn test_store_errors_are_internal() {
        let error: ServiceError = StoreError::from(sqlx::Error::PoolTimedOut).into();
        assert!(error.is_internal());
        assert!(matches!(
            error,
            ServiceError::Store {
                source: StoreError::Database { .. }
            }
        ));
    }

    #[test]
    fn test_non_unique_write_errors_stay_database_errors() {
        let error = StoreError::from_write(sqlx::Error::RowNotFound, "User", "a@b.c");
        assert!(matches!(error, StoreError::Database { .. }));
    }
}

//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::response;

/// Startup-time configuration failures. These abort the process before it
/// can serve traffic.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unsupported storage backend '{0}'")]
    UnsupportedBackend(String),
    #[error("invalid connection string: {0}")]
    ConnectionString(#[source] sqlx::Error),
    #[error("invalid value for {var}: {message}")]
    Var { var: &'static str, message: String },
}

/// Normalized request-time failure. Every storage backend and handler maps
/// its faults into one of these three classes, so callers never see
/// driver-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The caller sent something the operation cannot act on.
    #[error("{0}")]
    Validation(String),
    /// The named resource or row does not exist.
    #[error("resource not found")]
    NotFound { source: Option<sqlx::Error> },
    /// The backend failed; the message is already safe to return.
    #[error("{message}")]
    Backend {
        message: String,
        source: Option<sqlx::Error>,
    },
}

impl StorageError {
    pub fn validation(message: impl Into<String>) -> Self {
        StorageError::Validation(message.into())
    }

    pub fn not_found() -> Self {
        StorageError::NotFound { source: None }
    }

    pub fn not_found_from(source: sqlx::Error) -> Self {
        StorageError::NotFound {
            source: Some(source),
        }
    }

    pub fn backend(message: impl Into<String>, source: Option<sqlx::Error>) -> Self {
        StorageError::Backend {
            message: message.into(),
            source,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            StorageError::Validation(_) => StatusCode::BAD_REQUEST,
            StorageError::NotFound { .. } => StatusCode::NOT_FOUND,
            StorageError::Backend { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> u16 {
        self.status().as_u16()
    }

    /// Original driver error, when one was preserved for logging.
    pub fn cause(&self) -> Option<&sqlx::Error> {
        match self {
            StorageError::Validation(_) => None,
            StorageError::NotFound { source } => source.as_ref(),
            StorageError::Backend { source, .. } => source.as_ref(),
        }
    }
}

impl IntoResponse for StorageError {
    fn into_response(self) -> Response {
        response::message(self.status(), self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_class() {
        assert_eq!(StorageError::validation("x").code(), 400);
        assert_eq!(StorageError::not_found().code(), 404);
        assert_eq!(StorageError::backend("unknown error", None).code(), 400);
    }

    #[test]
    fn not_found_message_is_fixed() {
        assert_eq!(StorageError::not_found().to_string(), "resource not found");
        assert_eq!(
            StorageError::not_found_from(sqlx::Error::RowNotFound).to_string(),
            "resource not found"
        );
    }

    #[test]
    fn cause_preserves_driver_error() {
        let err = StorageError::backend("unknown error", Some(sqlx::Error::RowNotFound));
        assert!(err.cause().is_some());
        assert!(StorageError::validation("x").cause().is_none());
    }
}

//! Error types for the web layer.
//!
//! Errors that abort a request are rendered as a plain HTML error page; no
//! partial page is ever sent. Account problems such as a taken email are not
//! errors at this level, they are shown inline on the form that caused them.
//!
//! # Error Mapping
//!
//! | Storage Error | HTTP Status |
//! |--------------|-------------|
//! | ConnectionFailed | 503 |
//! | QueryError / SchemaError / SerializationError | 500 |
//! | Validation | 400 |
//! | EmailTaken | 400 |
//! | PasswordHash | 500 |
//! | Load | 500 |

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use handlebars::html_escape;
use medisae_persistence::error::{AccountError, BackendError, StorageError, ValidationError};
use std::fmt;

/// The primary error type for request handling.
#[derive(Debug)]
pub enum RestError {
    /// Malformed request input (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },
    /// A store could not be reached (HTTP 503).
    ServiceUnavailable {
        /// Error message.
        message: String,
    },
    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },
}

impl RestError {
    /// Returns the HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::BadRequest { message } => write!(f, "Bad request: {}", message),
            RestError::ServiceUnavailable { message } => {
                write!(f, "Service unavailable: {}", message)
            }
            RestError::InternalError { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (title, details) = match &self {
            RestError::BadRequest { message } => ("Bad request", message.clone()),
            // Backend details go to the log, not to the visitor.
            RestError::ServiceUnavailable { message } => {
                tracing::error!(error = %message, "Store unavailable");
                (
                    "Service unavailable",
                    "The medication database is currently unreachable. Please try again later."
                        .to_string(),
                )
            }
            RestError::InternalError { message } => {
                tracing::error!(error = %message, "Request failed");
                (
                    "Something went wrong",
                    "An unexpected error occurred while processing your request.".to_string(),
                )
            }
        };

        (status, Html(error_page(status, title, &details))).into_response()
    }
}

/// Renders a self-contained error page.
///
/// Kept independent of the template registry so it renders even when the
/// registry is what failed.
pub fn error_page(status: StatusCode, title: &str, details: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{code} {title} | MEDICSEARCH</title></head>\n<body>\n<main class=\"error\">\n<h1>{code} {title}</h1>\n<p>{details}</p>\n<p><a href=\"/\">Back to home</a></p>\n</main>\n</body>\n</html>\n",
        code = status.as_u16(),
        title = html_escape(title),
        details = html_escape(details),
    )
}

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Backend(e) => e.into(),
            StorageError::Account(e) => e.into(),
            StorageError::Validation(e) => e.into(),
            StorageError::Load(e) => RestError::InternalError {
                message: e.to_string(),
            },
        }
    }
}

impl From<BackendError> for RestError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::ConnectionFailed { .. } => RestError::ServiceUnavailable {
                message: err.to_string(),
            },
            BackendError::SchemaError { .. }
            | BackendError::QueryError { .. }
            | BackendError::SerializationError { .. } => RestError::InternalError {
                message: err.to_string(),
            },
        }
    }
}

impl From<AccountError> for RestError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::EmailTaken { .. } => RestError::BadRequest {
                message: err.to_string(),
            },
            AccountError::PasswordHash { .. } => RestError::InternalError {
                message: err.to_string(),
            },
        }
    }
}

impl From<ValidationError> for RestError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidFilterValue { filter, value } => RestError::BadRequest {
                message: format!("Invalid value '{}' for filter '{}'", value, filter),
            },
            ValidationError::InvalidField { field, message } => RestError::BadRequest {
                message: format!("Invalid {}: {}", field, message),
            },
        }
    }
}

impl From<handlebars::RenderError> for RestError {
    fn from(err: handlebars::RenderError) -> Self {
        RestError::InternalError {
            message: format!("template rendering failed: {}", err),
        }
    }
}

/// Result type for handlers.
pub type RestResult<T> = Result<T, RestError>;

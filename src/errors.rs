//! # Error Handling
//!
//! Every failure leaving a repository or a controller is an [`ApiError`]. An error
//! either carries a message meant for the client (not found, bad request,
//! unauthorized, validation failed) or it is collapsed into a generic fatal
//! response whose details only reach the logs.
//!
//! ```rust,ignore
//! use crudkit::ApiError;
//!
//! async fn handler(repo: Repository<Note>) -> Result<Json<Note>, ApiError> {
//!     let note = repo
//!         .get_as::<Note>(id)
//!         .await?
//!         .ok_or_else(|| ApiError::not_found("Note does not exist"))?;
//!     Ok(Json(note))
//! }
//! ```
//!
//! Internal errors are logged through `tracing`; install a subscriber (see
//! [`crate::telemetry`]) to see them.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::validation::ValidationErrors;

/// Message sent to clients for any error whose details must stay server-side.
pub const FATAL_ERROR: &str = "Something bad happened. Try again later";

/// API error type with automatic logging and sanitized responses
#[derive(Debug)]
pub enum ApiError {
    /// 404 Not Found - the addressed entity does not exist
    NotFound {
        /// User-facing error message
        message: String,
    },

    /// 400 Bad Request - invalid argument from the caller
    BadRequest {
        /// User-facing error message
        message: String,
    },

    /// 401 Unauthorized - no usable user identity on the request
    Unauthorized {
        /// User-facing error message
        message: String,
    },

    /// 422 Unprocessable Entity - payload validation failed
    ValidationFailed {
        /// User-facing validation errors
        errors: Vec<String>,
    },

    /// 500 Internal Server Error - database error (details logged, not exposed)
    Database {
        /// Internal error (logged, not sent to user)
        internal: DbErr,
    },

    /// 500 Internal Server Error - any other failure (details logged, not exposed)
    Internal {
        /// Internal error details (logged, not sent to user)
        internal: String,
    },
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn validation_failed(errors: Vec<String>) -> Self {
        Self::ValidationFailed { errors }
    }

    #[must_use]
    pub fn database(err: DbErr) -> Self {
        Self::Database { internal: err }
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::Internal {
            internal: details.into(),
        }
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True when the message may be shown to the client as is.
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::Database { .. } | Self::Internal { .. })
    }

    /// Get the user-facing error message (sanitized)
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { message }
            | Self::BadRequest { message }
            | Self::Unauthorized { message } => message.clone(),
            Self::ValidationFailed { errors } => {
                if errors.len() == 1 {
                    errors[0].clone()
                } else {
                    format!("Validation failed: {}", errors.join(", "))
                }
            }
            Self::Database { .. } | Self::Internal { .. } => FATAL_ERROR.to_string(),
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Database { internal } => {
                tracing::error!(error = ?internal, "Database error occurred");
            }
            Self::Internal { internal } => {
                tracing::error!(details = %internal, "Internal error occurred");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

/// Error body sent to clients
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Validation errors, one entry per failed rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ErrorResponse {
    /// Body used for every error that is not user-facing.
    #[must_use]
    pub fn fatal() -> Self {
        Self {
            error: FATAL_ERROR.to_string(),
            details: None,
        }
    }
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::ValidationFailed { errors } => Self {
                error: "Validation failed".to_string(),
                details: Some(errors.clone()),
            },
            _ => Self {
                error: err.user_message(),
                details: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();
        (self.status_code(), Json(ErrorResponse::from(&self))).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database { internal } => write!(f, "database error: {internal}"),
            Self::Internal { internal } => write!(f, "internal error: {internal}"),
            _ => write!(f, "{}", self.user_message()),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Database { internal } => Some(internal),
            _ => None,
        }
    }
}

/// `DbErr::RecordNotFound` keeps its message as a 404; every other database
/// error becomes an opaque 500.
impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::RecordNotFound(message) => Self::NotFound { message },
            other => Self::Database { internal: other },
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::ValidationFailed {
            errors: errors.errors().iter().map(ToString::to_string).collect(),
        }
    }
}

//! Error taxonomy shared by services and repositories.
//!
//! - [`AppError::Validation`] carries a field → message map and never has side effects
//! - [`AppError::NotFound`] reports a missing link
//! - [`AppError::Codec`] reports a malformed short code
//! - [`AppError::Conflict`] and [`AppError::Internal`] report storage failures
//!
//! [`AppError`] implements axum's `IntoResponse` so an HTTP layer can return
//! it directly.

use std::collections::BTreeMap;
use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::utils::short_code::CodecError;

/// Submission field names used as keys in [`ValidationErrors`].
pub mod fields {
    pub const ORIGINAL_URL: &str = "original_url";
    pub const ALIAS: &str = "special_url";
    pub const EXPIRE_DATE: &str = "expire_date";
    pub const EXPIRE_TIME: &str = "expire_time";
    pub const TIMEZONE: &str = "timezone";
    pub const USER_EMAIL: &str = "user_email";
    pub const USER_MOBILE: &str = "user_mobile";
}

/// User-facing validation messages.
pub mod messages {
    pub const URL_REQUIRED: &str = "URL is Required.";
    pub const URL_INVALID: &str = "Invalid URL.";
    pub const ALIAS_SPECIAL_CHARACTERS: &str =
        "URL Alias should not contain special characters except underscore (_) or hyphen (-).";
    pub const ALIAS_UNAVAILABLE: &str = "URL Alias not available.";
    pub const DATE_INVALID: &str = "Invalid date.";
    pub const TIME_INVALID: &str = "Invalid time.";
    pub const TIMEZONE_INVALID: &str = "Invalid timezone.";
    pub const EMAIL_INVALID: &str = "Invalid email.";
    pub const MOBILE_INVALID: &str = "Invalid mobile number.";
}

/// Field-scoped validation failures, at most one message per field.
///
/// Serializes as a plain JSON object of `field: message` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for `field`, replacing any earlier one.
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    /// The error for a rejected alias.
    pub fn alias_unavailable() -> Self {
        let mut errors = Self::new();
        errors.insert(fields::ALIAS, messages::ALIAS_UNAVAILABLE);
        errors
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// True when no rule produced an error.
    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error summary.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("{message}")]
    Conflict { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Returns the validation errors if this is a validation failure.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            AppError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } | AppError::Codec(_) => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into the body shape returned to HTTP callers.
    pub fn to_error_info(&self) -> ErrorInfo {
        match self {
            AppError::Validation(errors) => ErrorInfo {
                code: "validation_error",
                message: "Validation failed".to_string(),
                details: json!(errors),
            },
            AppError::NotFound { message, details } => ErrorInfo {
                code: "not_found",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::Codec(e) => ErrorInfo {
                code: "invalid_code",
                message: e.to_string(),
                details: json!({}),
            },
            AppError::Conflict { message, details } => ErrorInfo {
                code: "conflict",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::Internal { message, details } => ErrorInfo {
                code: "internal_error",
                message: message.clone(),
                details: details.clone(),
            },
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return AppError::conflict(
            "Unique constraint violation",
            json!({ "constraint": db.constraint() }),
        );
    }

    tracing::error!("Database error: {}", e);
    AppError::internal("Database error", json!({}))
}

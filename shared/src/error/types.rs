//! Error types and the API response envelope

use super::codes::ErrorCode;
use crate::types::Pagination;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Field name -> list of human readable validation messages
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Application error with structured error code and details
///
/// This is the primary error type of the server, providing:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details (field-level validation errors)
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a validation error carrying one entry per offending field
    pub fn invalid_fields(errors: FieldErrors) -> Self {
        errors
            .into_iter()
            .fold(Self::new(ErrorCode::ValidationFailed), |err, (field, messages)| {
                err.with_detail(field, messages)
            })
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::NotFound, format!("{} not found", resource.into()))
    }

    /// Create a not authenticated error
    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create an invalid token error
    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    /// Create a token expired error
    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::AlreadyExists, msg)
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

/// Envelope status: `success` on 2xx, `error` on 5xx, `failed` otherwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Failed,
    Error,
}

/// Failure payload: a plain message, or a field -> messages map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorBody {
    Message(String),
    Fields(HashMap<String, Value>),
}

/// Unified API response envelope
///
/// ```json
/// {"status": "success", "data": {...}, "pagination": {...}}
/// {"status": "failed", "code": 3001, "error": "Meal not found"}
/// {"status": "failed", "code": 2, "message": "Validation failed", "error": {"name": ["..."]}}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    /// Error code (absent on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with data
    pub fn success(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            code: None,
            data: Some(data),
            message: None,
            error: None,
            qr_code_url: None,
            pagination: None,
        }
    }

    /// Attach pagination metadata
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Attach the public URL of a generated QR code
    pub fn with_qr_code_url(mut self, url: impl Into<String>) -> Self {
        self.qr_code_url = Some(url.into());
        self
    }

    /// Whether this envelope reports success
    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

impl ApiResponse<()> {
    /// Create a success response carrying only a message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            code: None,
            data: None,
            message: Some(message.into()),
            error: None,
            qr_code_url: None,
            pagination: None,
        }
    }

    /// Create a failure response from an AppError
    pub fn failure(err: &AppError) -> Self {
        let status = if err.http_status().is_server_error() {
            ResponseStatus::Error
        } else {
            ResponseStatus::Failed
        };
        let (message, error) = match &err.details {
            Some(details) => (
                Some(err.message.clone()),
                ErrorBody::Fields(details.clone()),
            ),
            None => (None, ErrorBody::Message(err.message.clone())),
        };
        Self {
            status,
            code: Some(err.code.code()),
            data: None,
            message,
            error: Some(error),
            qr_code_url: None,
            pagination: None,
        }
    }
}

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        let body = ApiResponse::<()>::failure(&self);

        // Log system errors
        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, Json(body)).into_response()
    }
}

impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = match self.code {
            None => StatusCode::OK,
            Some(code) => ErrorCode::try_from(code)
                .map(|c| c.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        };

        (status, Json(self)).into_response()
    }
}

//! Error types and API response structures

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// Used for every client-checked validation failure and for decoded
/// server-side rejections.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
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

    /// Create a missing required field error
    pub fn required(field: impl Into<String>) -> Self {
        let f = field.into();
        Self::with_message(ErrorCode::RequiredField, format!("{} is required", f))
            .with_detail("field", f)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create a not authenticated error
    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create an invalid request error
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }
}

/// Unified API response structure
///
/// Non-2xx responses carry at least `message`; `code` and `details` are
/// optional so plain `{"message": "..."}` bodies decode too.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Error code (0 for success, non-zero for errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Additional error details (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with data
    pub fn success(data: T) -> Self {
        Self {
            code: Some(0),
            message: "OK".to_string(),
            data: Some(data),
            details: None,
        }
    }

    /// Convert an error body into an [`AppError`]
    ///
    /// `status` is used to classify bodies that carry no (or an unknown) code.
    pub fn into_error(self, status: StatusCode) -> AppError {
        let code = self
            .code
            .and_then(|c| ErrorCode::try_from(c).ok())
            .filter(|c| !c.is_success())
            .unwrap_or_else(|| ErrorCode::from_http_status(status));
        let message = if self.message.is_empty() {
            code.message().to_string()
        } else {
            self.message
        };
        AppError {
            code,
            message,
            details: self.details,
        }
    }
}

impl ApiResponse<()> {
    /// Create an error response from an AppError
    pub fn error(err: &AppError) -> Self {
        Self {
            code: Some(err.code.code()),
            message: err.message.clone(),
            data: None,
            details: err.details.clone(),
        }
    }
}

impl<T> From<AppError> for ApiResponse<T> {
    fn from(err: AppError) -> Self {
        Self {
            code: Some(err.code.code()),
            message: err.message,
            data: None,
            details: err.details,
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::NotFound);
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Resource not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::validation("Missing required fields")
            .with_detail("field", "customerName")
            .with_detail("reason", "required");

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(details.get("field").unwrap(), "customerName");
        assert_eq!(details.get("reason").unwrap(), "required");
    }

    #[test]
    fn test_required_field() {
        let err = AppError::required("description");
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.message, "description is required");
    }

    #[test]
    fn test_app_error_http_status() {
        assert_eq!(
            AppError::new(ErrorCode::NotAuthenticated).http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::permission_denied("Admin only").http_status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::with_message(ErrorCode::OrderNotFound, "Order 42 not found");
        assert_eq!(format!("{}", err), "Order 42 not found");
    }

    #[test]
    fn test_plain_message_body_into_error() {
        let body: ApiResponse<Value> =
            serde_json::from_str(r#"{"message":"Already clocked in today"}"#).unwrap();
        let err = body.into_error(StatusCode::CONFLICT);
        assert_eq!(err.code, ErrorCode::AlreadyExists);
        assert_eq!(err.message, "Already clocked in today");
    }

    #[test]
    fn test_coded_body_into_error() {
        let body: ApiResponse<Value> =
            serde_json::from_str(r#"{"code":7001,"message":"nope"}"#).unwrap();
        let err = body.into_error(StatusCode::BAD_REQUEST);
        assert_eq!(err.code, ErrorCode::AlreadyClockedIn);
    }

    #[test]
    fn test_empty_body_falls_back_to_status_message() {
        let body: ApiResponse<Value> = serde_json::from_str("{}").unwrap();
        let err = body.into_error(StatusCode::NOT_FOUND);
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Resource not found");
    }

    #[test]
    fn test_api_response_error_roundtrip() {
        let err = AppError::new(ErrorCode::ActivePhotoLimit);
        let response = ApiResponse::<()>::error(&err);
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"code\":6202"));
        assert!(!json.contains("\"data\""));
    }
}

//! Client error types

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server rejected the request (non-2xx with a JSON body)
    #[error("API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: ErrorCode,
        message: String,
    },

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Client-side validation failed; nothing was sent
    #[error("Validation error: {0}")]
    Validation(#[from] AppError),

    /// Local persistence failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Realtime channel failure
    #[error("Realtime error: {0}")]
    Realtime(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Error code for this failure
    pub fn code(&self) -> ErrorCode {
        match self {
            ClientError::Http(e) if e.is_timeout() => ErrorCode::TimeoutError,
            ClientError::Http(_) => ErrorCode::NetworkError,
            ClientError::Api { code, .. } => *code,
            ClientError::Unauthorized => ErrorCode::NotAuthenticated,
            ClientError::Forbidden(_) => ErrorCode::PermissionDenied,
            ClientError::NotFound(_) => ErrorCode::NotFound,
            ClientError::Validation(e) => e.code,
            ClientError::Storage(_) => ErrorCode::StorageUnavailable,
            ClientError::Realtime(_) => ErrorCode::NetworkError,
            ClientError::InvalidResponse(_) | ClientError::Serialization(_) => {
                ErrorCode::InternalError
            }
            ClientError::Config(_) => ErrorCode::ConfigError,
        }
    }

    /// The request never got an answer (offline, DNS, timeout)
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Http(_) | ClientError::Realtime(_))
    }

    /// Rejected locally before anything was sent
    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }

    /// Text for the transient notification shown to the user
    pub fn notice(&self) -> String {
        match self {
            ClientError::Http(_) | ClientError::Realtime(_) => {
                "Network error. Please check your connection and try again.".to_string()
            }
            ClientError::Api { message, .. } => message.clone(),
            ClientError::Unauthorized => "Your session has expired. Please log in again.".to_string(),
            ClientError::Forbidden(message) | ClientError::NotFound(message) => message.clone(),
            ClientError::Validation(e) => e.message.clone(),
            ClientError::Storage(_) => {
                "Settings could not be saved on this device; they will last until you close the app."
                    .to_string()
            }
            ClientError::InvalidResponse(_)
            | ClientError::Serialization(_)
            | ClientError::Config(_) => self.code().message().to_string(),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

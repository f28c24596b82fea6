//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::NotFound
            | Self::OrderNotFound
            | Self::OrderItemNotFound
            | Self::WithdrawalNotFound
            | Self::MenuItemNotFound
            | Self::CategoryNotFound
            | Self::PhotoNotFound
            | Self::DtrRecordNotFound
            | Self::InventoryItemNotFound
            | Self::BranchNotFound => StatusCode::NOT_FOUND,

            Self::AlreadyExists
            | Self::OrderAlreadyPaid
            | Self::CategoryNameExists
            | Self::SummaryAlreadySubmitted
            | Self::ActivePhotoLimit
            | Self::AlreadyClockedIn
            | Self::NotClockedIn => StatusCode::CONFLICT,

            Self::NotAuthenticated | Self::InvalidCredentials | Self::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }

            Self::PermissionDenied | Self::AdminRequired | Self::BranchAccessDenied => {
                StatusCode::FORBIDDEN
            }

            Self::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedFileFormat => StatusCode::UNSUPPORTED_MEDIA_TYPE,

            Self::NetworkError | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::StorageUnavailable
            | Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,

            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Best-effort classification of a bare HTTP status into an error code
    ///
    /// Used when the server rejects a request without a structured code.
    pub fn from_http_status(status: StatusCode) -> Self {
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Self::ValidationFailed,
            StatusCode::UNAUTHORIZED => Self::NotAuthenticated,
            StatusCode::FORBIDDEN => Self::PermissionDenied,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::CONFLICT => Self::AlreadyExists,
            StatusCode::PAYLOAD_TOO_LARGE => Self::FileTooLarge,
            StatusCode::UNSUPPORTED_MEDIA_TYPE => Self::UnsupportedFileFormat,
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => Self::TimeoutError,
            StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE => Self::NetworkError,
            s if s.is_server_error() => Self::InternalError,
            _ => Self::Unknown,
        }
    }
}

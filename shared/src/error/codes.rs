//! Unified error codes for Brewline
//!
//! Error codes are shared between the API server contract and the client so
//! that server-rejected errors can be classified without parsing messages.
//! Codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Branch errors
//! - 4xxx: Order errors
//! - 5xxx: Payment / expense errors
//! - 6xxx: Menu, photo and upload errors
//! - 7xxx: Attendance (DTR) errors
//! - 8xxx: Inventory errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Super admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Branch ====================
    /// No branch selected
    BranchNotSelected = 3001,
    /// Branch not found
    BranchNotFound = 3002,
    /// User has no access to the branch
    BranchAccessDenied = 3003,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has already been paid
    OrderAlreadyPaid = 4002,
    /// Order item not found
    OrderItemNotFound = 4006,
    /// Order is empty
    OrderEmpty = 4007,

    // ==================== 5xxx: Payment / Expense ====================
    /// Cash + GCash does not match the items total
    PaymentSplitMismatch = 5001,
    /// Amount must be positive
    InvalidAmount = 5002,
    /// Withdrawal not found
    WithdrawalNotFound = 5101,
    /// Daily summary already submitted
    SummaryAlreadySubmitted = 5201,

    // ==================== 6xxx: Menu / Photo / Upload ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Category not found
    CategoryNotFound = 6101,
    /// Category name already exists
    CategoryNameExists = 6103,
    /// Customer photo not found
    PhotoNotFound = 6201,
    /// Active photo limit reached
    ActivePhotoLimit = 6202,
    /// File too large
    FileTooLarge = 6501,
    /// Unsupported file format
    UnsupportedFileFormat = 6502,
    /// Empty file
    EmptyFile = 6505,

    // ==================== 7xxx: Attendance ====================
    /// Already clocked in
    AlreadyClockedIn = 7001,
    /// Not clocked in
    NotClockedIn = 7002,
    /// DTR record not found
    DtrRecordNotFound = 7003,

    // ==================== 8xxx: Inventory ====================
    /// Inventory item not found
    InventoryItemNotFound = 8001,
    /// Stock would become negative
    InsufficientStock = 8002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Request timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Local storage unavailable
    StorageUnavailable = 9401,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this code represents success
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Success => "Operation completed successfully",
            Self::Unknown => "An unknown error occurred",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::RequiredField => "Required field is missing",
            Self::ValueOutOfRange => "Value is out of range",

            Self::NotAuthenticated => "Authentication required",
            Self::InvalidCredentials => "Invalid email or password",
            Self::TokenExpired => "Session has expired, please log in again",

            Self::PermissionDenied => "Permission denied",
            Self::AdminRequired => "Super admin role required",

            Self::BranchNotSelected => "No branch selected",
            Self::BranchNotFound => "Branch not found",
            Self::BranchAccessDenied => "You do not have access to this branch",

            Self::OrderNotFound => "Order not found",
            Self::OrderAlreadyPaid => "Order has already been paid",
            Self::OrderItemNotFound => "Order item not found",
            Self::OrderEmpty => "Order has no items",

            Self::PaymentSplitMismatch => "Cash and GCash must add up to the total sales",
            Self::InvalidAmount => "Amount must be greater than zero",
            Self::WithdrawalNotFound => "Withdrawal not found",
            Self::SummaryAlreadySubmitted => "Daily summary has already been submitted",

            Self::MenuItemNotFound => "Menu item not found",
            Self::CategoryNotFound => "Category not found",
            Self::CategoryNameExists => "Category name already exists",
            Self::PhotoNotFound => "Customer photo not found",
            Self::ActivePhotoLimit => "Maximum of 6 active photos allowed",
            Self::FileTooLarge => "File size must be less than 5MB",
            Self::UnsupportedFileFormat => "Only JPEG, PNG, GIF and WebP images are allowed",
            Self::EmptyFile => "File is empty",

            Self::AlreadyClockedIn => "Already clocked in",
            Self::NotClockedIn => "Not clocked in",
            Self::DtrRecordNotFound => "Time record not found",

            Self::InventoryItemNotFound => "Inventory item not found",
            Self::InsufficientStock => "Insufficient stock",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::NetworkError => "Network error",
            Self::TimeoutError => "Request timed out",
            Self::ConfigError => "Configuration error",
            Self::StorageUnavailable => "Local storage is unavailable",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),

            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),

            3001 => Ok(ErrorCode::BranchNotSelected),
            3002 => Ok(ErrorCode::BranchNotFound),
            3003 => Ok(ErrorCode::BranchAccessDenied),

            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderAlreadyPaid),
            4006 => Ok(ErrorCode::OrderItemNotFound),
            4007 => Ok(ErrorCode::OrderEmpty),

            5001 => Ok(ErrorCode::PaymentSplitMismatch),
            5002 => Ok(ErrorCode::InvalidAmount),
            5101 => Ok(ErrorCode::WithdrawalNotFound),
            5201 => Ok(ErrorCode::SummaryAlreadySubmitted),

            6001 => Ok(ErrorCode::MenuItemNotFound),
            6101 => Ok(ErrorCode::CategoryNotFound),
            6103 => Ok(ErrorCode::CategoryNameExists),
            6201 => Ok(ErrorCode::PhotoNotFound),
            6202 => Ok(ErrorCode::ActivePhotoLimit),
            6501 => Ok(ErrorCode::FileTooLarge),
            6502 => Ok(ErrorCode::UnsupportedFileFormat),
            6505 => Ok(ErrorCode::EmptyFile),

            7001 => Ok(ErrorCode::AlreadyClockedIn),
            7002 => Ok(ErrorCode::NotClockedIn),
            7003 => Ok(ErrorCode::DtrRecordNotFound),

            8001 => Ok(ErrorCode::InventoryItemNotFound),
            8002 => Ok(ErrorCode::InsufficientStock),

            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9401 => Ok(ErrorCode::StorageUnavailable),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

//! Unified error codes for the menu server
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Menu errors
//! - 4xxx: Dining table errors
//! - 5xxx: Asset errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so clients can match on
/// them without parsing messages.
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
    /// Requested page is past the last page
    PageOutOfRange = 9,
    /// Query matched nothing
    NoResults = 10,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Menu ====================
    /// Meal not found (or not visible to the caller)
    MealNotFound = 3001,
    /// Meal type is not vegetarian / non-vegetarian
    InvalidMealType = 3002,
    /// Meal status filter is not active / inactive
    InvalidMealStatus = 3003,
    /// Category not found
    CategoryNotFound = 3101,
    /// Size/cost variant not found
    SizeCostNotFound = 3201,
    /// Size already exists for this meal
    SizeCostExists = 3202,
    /// Size already exists for this meal with another record
    SizeCostExistsOther = 3203,

    // ==================== 4xxx: Dining table ====================
    /// Dining table not found
    TableNotFound = 4001,
    /// Dining table with the same floor and number exists
    TableAlreadyExists = 4002,
    /// QR code generation failed
    QrCodeFailed = 4003,

    // ==================== 5xxx: Asset ====================
    /// Stored asset not found
    AssetNotFound = 5001,
    /// Writing or removing an asset failed
    StorageFailed = 5002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::PageOutOfRange => "Page number exceeds the last available page",
            ErrorCode::NoResults => "No results found",

            // Auth
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Admin role required",

            // Menu
            ErrorCode::MealNotFound => "Meal not found",
            ErrorCode::InvalidMealType => "Invalid type",
            ErrorCode::InvalidMealStatus => {
                "Invalid status value. Please enter active or inactive"
            }
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::SizeCostNotFound => "Size cost not found",
            ErrorCode::SizeCostExists => "Size already exists for this meal",
            ErrorCode::SizeCostExistsOther => {
                "Size already exists for this meal with another record"
            }

            // Dining table
            ErrorCode::TableNotFound => "Dining table not found",
            ErrorCode::TableAlreadyExists => "Dining table already exists",
            ErrorCode::QrCodeFailed => "Failed to generate QR code",

            // Asset
            ErrorCode::AssetNotFound => "File not found",
            ErrorCode::StorageFailed => "Failed to store file",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            9 => Ok(ErrorCode::PageOutOfRange),
            10 => Ok(ErrorCode::NoResults),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),

            // Menu
            3001 => Ok(ErrorCode::MealNotFound),
            3002 => Ok(ErrorCode::InvalidMealType),
            3003 => Ok(ErrorCode::InvalidMealStatus),
            3101 => Ok(ErrorCode::CategoryNotFound),
            3201 => Ok(ErrorCode::SizeCostNotFound),
            3202 => Ok(ErrorCode::SizeCostExists),
            3203 => Ok(ErrorCode::SizeCostExistsOther),

            // Dining table
            4001 => Ok(ErrorCode::TableNotFound),
            4002 => Ok(ErrorCode::TableAlreadyExists),
            4003 => Ok(ErrorCode::QrCodeFailed),

            // Asset
            5001 => Ok(ErrorCode::AssetNotFound),
            5002 => Ok(ErrorCode::StorageFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

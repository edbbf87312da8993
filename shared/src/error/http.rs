//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::NoResults
            | Self::MealNotFound
            | Self::CategoryNotFound
            | Self::SizeCostNotFound
            | Self::TableNotFound
            | Self::AssetNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists | Self::TableAlreadyExists => StatusCode::CONFLICT,

            // 422 Unprocessable Entity
            Self::SizeCostExists | Self::SizeCostExistsOther => {
                StatusCode::UNPROCESSABLE_ENTITY
            }

            // 401 Unauthorized
            Self::NotAuthenticated | Self::TokenExpired | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }

            // 403 Forbidden
            Self::PermissionDenied | Self::AdminRequired => StatusCode::FORBIDDEN,

            // 500 Internal Server Error
            Self::Unknown
            | Self::QrCodeFailed
            | Self::StorageFailed
            | Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (validation, malformed input, page overrun)
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::PageOutOfRange
            | Self::InvalidMealType
            | Self::InvalidMealStatus => StatusCode::BAD_REQUEST,
        }
    }
}

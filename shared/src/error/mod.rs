//! Unified error system for the menu server
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: The `{status, data, message, error, ...}` envelope
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Menu errors (meals, categories, size/cost variants)
//! - 4xxx: Dining table errors
//! - 5xxx: Asset errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::MealNotFound);
//! let err = AppError::with_message(ErrorCode::InvalidMealType, "Invalid type");
//!
//! let response = ApiResponse::<()>::failure(&err);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult, ErrorBody, FieldErrors, ResponseStatus};

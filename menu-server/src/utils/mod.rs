//! Utilities
//!
//! - [`AppError`] / [`ApiResponse`] - error and envelope types (from `shared::error`)
//! - [`logger`] - tracing subscriber setup
//! - [`validation`] - declarative request field validation

pub mod logger;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode, FieldErrors};

//! Shared types for the menu server
//!
//! Common types used by the server and its clients: error codes, the
//! response envelope, pagination metadata and the menu/seating models.

pub mod error;
pub mod models;
pub mod request;
pub mod types;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use types::Pagination;

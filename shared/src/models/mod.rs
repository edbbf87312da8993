//! Data models
//!
//! Shared between the server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod category;
pub mod dining_table;
pub mod meal;
pub mod meal_size_cost;

// Re-exports
pub use category::*;
pub use dining_table::*;
pub use meal::*;
pub use meal_size_cost::*;

//! Category Model

use serde::{Deserialize, Serialize};

/// Menu category (read-only reference for meals)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
}

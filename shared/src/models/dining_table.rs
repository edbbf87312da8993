//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Dining table entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub id: i64,
    pub num: i64,
    pub size: i64,
    pub floor: i64,
    pub status: bool,
    /// Relative path of the generated QR image, once generated
    pub qr_code: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create dining table payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub num: i64,
    pub size: i64,
    pub floor: i64,
    pub status: bool,
}

/// Update dining table payload (only `Some` fields are applied)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiningTablePatch {
    pub floor: Option<i64>,
    pub size: Option<i64>,
    pub num: Option<i64>,
    pub status: Option<bool>,
}

impl DiningTablePatch {
    pub fn is_empty(&self) -> bool {
        self.floor.is_none() && self.size.is_none() && self.num.is_none() && self.status.is_none()
    }
}

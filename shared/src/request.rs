//! Request types for the shared crate

use serde::{Deserialize, Deserializer};

/// Default page size of the meal listing filters
pub const DEFAULT_PER_PAGE: i64 = 12;

/// `?page=` query parameter
///
/// Missing, non-numeric or non-positive values resolve to page 1.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page", deserialize_with = "lenient_page")]
    pub page: i64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self { page: 1 }
    }
}

fn default_page() -> i64 {
    1
}

fn lenient_page<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1))
}

//! Common types for the shared crate

use serde::{Deserialize, Serialize};

/// Pagination metadata returned alongside a page of results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: i64,
    pub per_page: i64,
    pub current_page: i64,
    pub last_page: i64,
}

impl Pagination {
    /// Build metadata for `current_page` of a `total`-row result.
    ///
    /// `last_page` is never below 1, so an empty result still has one page.
    pub fn new(total: i64, per_page: i64, current_page: i64) -> Self {
        let per_page = per_page.max(1);
        let last_page = ((total + per_page - 1) / per_page).max(1);
        Self {
            total,
            per_page,
            current_page,
            last_page,
        }
    }

    /// Row offset of the first item on the current page
    pub fn offset(&self) -> i64 {
        (self.current_page.max(1) - 1) * self.per_page
    }

    /// True when the requested page lies past the last page
    pub fn is_out_of_range(&self) -> bool {
        self.current_page > self.last_page
    }
}

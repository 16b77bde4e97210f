use serde::Deserialize;

use crate::{models::OrderStatus, store::Page};

// Query structs stay flat: `serde(flatten)` breaks numeric fields under
// `serde_urlencoded`.

#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl Pagination {
    /// Returns `(page, per_page, window)`.
    pub fn normalize(&self) -> (u64, u64, Page) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        // Postgres binds OFFSET as BIGINT; past that every page is empty anyway.
        let offset = (page - 1)
            .saturating_mul(per_page)
            .min(i64::MAX as u64);
        (
            page,
            per_page,
            Page {
                limit: per_page,
                offset,
            },
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub status: Option<OrderStatus>,
}

impl OrderListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

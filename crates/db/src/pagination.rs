//! Offset pagination shared by every list endpoint.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub const DEFAULT_PAGE: u32 = 0;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Page selection as it arrives on the query string (`?page=&limit=`).
#[derive(Debug, Clone, Copy, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageRequest {
    /// Page number (0-based)
    #[param(default = 0, minimum = 0)]
    pub page: Option<u32>,
    /// Number of items per page
    #[param(default = 10, minimum = 1, maximum = 100)]
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// Fill in defaults and compute the row window.
    ///
    /// Assumes the request already passed validation.
    pub fn resolve(&self) -> PageWindow {
        let page = self.page.unwrap_or(DEFAULT_PAGE);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        PageWindow {
            page,
            limit,
            offset: u64::from(page) * u64::from(limit),
        }
    }
}

/// Resolved page: which rows to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub limit: u32,
    pub offset: u64,
}

impl PageWindow {
    /// `LIMIT` bind value.
    pub fn sql_limit(&self) -> i64 {
        i64::from(self.limit)
    }

    /// `OFFSET` bind value. Offsets beyond `i64::MAX` cannot exist in SQLite.
    pub fn sql_offset(&self) -> i64 {
        i64::try_from(self.offset).unwrap_or(i64::MAX)
    }

    /// Wrap a fetched slice and the table's total row count in an envelope.
    pub fn into_page<T>(self, items: Vec<T>, total: u64) -> Page<T> {
        Page {
            items,
            meta: PageMeta {
                total,
                page: self.page,
                limit: self.limit,
                total_pages: total_pages(total, self.limit),
            },
        }
    }
}

/// `ceil(total / limit)`; zero rows means zero pages.
pub fn total_pages(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(u64::from(limit))
}

/// Paginated response envelope.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Total number of rows across all pages
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

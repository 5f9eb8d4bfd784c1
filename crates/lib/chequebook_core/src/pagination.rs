//! Page/limit arithmetic for list endpoints.
//!
//! Pages are 1-based. Query values are parsed leniently: anything absent,
//! unparseable or below 1 falls back to the default. `limit` has no upper
//! bound.

use serde::{Deserialize, Serialize};

/// Page used when the request names none.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the request names none.
pub const DEFAULT_LIMIT: u32 = 10;

/// A requested page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Builds a request, replacing zero values with the defaults.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: if page == 0 { DEFAULT_PAGE } else { page },
            limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
        }
    }

    /// Builds a request from raw `page`/`limit` query values.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        Self::new(
            parse_positive(page).unwrap_or(DEFAULT_PAGE),
            parse_positive(limit).unwrap_or(DEFAULT_LIMIT),
        )
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Rows to skip: `(page - 1) * limit`.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

fn parse_positive(value: Option<&str>) -> Option<u32> {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
}

/// Pagination metadata returned alongside a page of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: u32,
    pub total_pages: u64,
    pub total_records: u64,
    pub limit: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageMeta {
    pub fn new(request: PageRequest, total_records: u64) -> Self {
        let total_pages = total_records.div_ceil(u64::from(request.limit));
        Self {
            current_page: request.page,
            total_pages,
            total_records,
            limit: request.limit,
            has_next: u64::from(request.page) < total_pages,
            has_prev: request.page > 1,
        }
    }
}

/// Slices `rows` (already in listing order) down to the requested page.
pub fn page_of<T: Clone>(rows: &[T], request: PageRequest) -> Vec<T> {
    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    rows.iter()
        .skip(offset)
        .take(request.limit as usize)
        .cloned()
        .collect()
}

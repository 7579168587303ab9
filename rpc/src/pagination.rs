//! Offset pagination for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size when `count` is not specified.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Maximum allowed page size.
pub const MAX_PAGE_SIZE: u32 = 500;

/// Common pagination parameters accepted by list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    /// Item offset from the start of the list.
    pub offset: Option<u64>,
    /// Number of items per page (default 50, max 500).
    pub count: Option<u32>,
}

impl PaginationParams {
    /// Resolve effective page size, clamped to [1, MAX_PAGE_SIZE].
    pub fn effective_count(&self) -> u32 {
        self.count
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> u64 {
        self.offset.unwrap_or(0)
    }
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    /// Offset to pass for the next page, or `None` on the last page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_offset: Option<u64>,
}

/// Compute the next-page offset. `None` when fewer items than a full page
/// were returned, meaning the end of the list was reached.
pub fn next_offset(current_offset: u64, returned: usize, page_size: u32) -> Option<u64> {
    if (returned as u32) < page_size {
        None
    } else {
        Some(current_offset + returned as u64)
    }
}

//! Pagination types for list operations.

use serde::{Deserialize, Serialize};

/// Largest offset storage backends accept (signed 64-bit)
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// Limit/offset window applied to a fetch query (never to its count).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PageWindow {
    pub limit: u64,
    pub offset: u64,
}

impl PageWindow {
    pub fn new(limit: u64, offset: u64) -> Self {
        Self { limit, offset }
    }

    /// Same window with the limit capped at `max` and the offset at
    /// [`MAX_OFFSET`]
    pub fn clamped(self, max: u64) -> Self {
        Self {
            limit: self.limit.min(max),
            offset: self.offset.min(MAX_OFFSET),
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Size of the full matching set, regardless of the window
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

impl<T> Paginated<T> {
    /// Create new paginated response
    pub fn new(data: Vec<T>, window: PageWindow, total: u64) -> Self {
        Self {
            data,
            meta: PaginationMeta {
                total,
                limit: window.limit,
                offset: window.offset,
            },
        }
    }

    /// Page with no rows and a zero total
    pub fn empty(window: PageWindow) -> Self {
        Self::new(Vec::new(), window, 0)
    }

    /// Convert every row, keeping the metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

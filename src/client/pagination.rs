//! Page and cursor bookkeeping for infinite-scroll lists.
//!
//! A feed hands out at most one request at a time: while a page is loading,
//! or once the list is exhausted, [`PageFeed::next_request`] and
//! [`CursorFeed::next_request`] return `None`.

use serde::{Deserialize, Serialize};

/// Page size the list endpoints are queried with.
pub const DEFAULT_PAGE_SIZE: u32 = 6;

/// Spring-style offset page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default = "default_last")]
    pub last: bool,
}

fn default_last() -> bool {
    true
}

/// Keyset page returned by the "my ..." endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<i64>,
    #[serde(default)]
    pub has_next: bool,
}

/// Offset-paged list state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFeed {
    next_page: u32,
    size: u32,
    exhausted: bool,
    loading: bool,
}

/// Page number and size to request next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl Default for PageFeed {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PageFeed {
    pub fn new(size: u32) -> Self {
        Self {
            next_page: 0,
            size,
            exhausted: false,
            loading: false,
        }
    }

    /// Claim the next page. Returns `None` while loading or when exhausted.
    pub fn next_request(&mut self) -> Option<PageRequest> {
        if self.loading || self.exhausted {
            return None;
        }
        self.loading = true;
        Some(PageRequest {
            page: self.next_page,
            size: self.size,
        })
    }

    /// Record a loaded page.
    pub fn complete<T>(&mut self, page: &Page<T>) {
        self.loading = false;
        self.next_page = page.number + 1;
        self.exhausted = page.last || page.content.is_empty();
    }

    /// Release the loading flag after a failed fetch so it can be retried.
    pub fn fail(&mut self) {
        self.loading = false;
    }

    /// Start over, e.g. after filters change.
    pub fn reset(&mut self) {
        *self = Self::new(self.size);
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_more(&self) -> bool {
        !self.exhausted
    }
}

/// Cursor-paged list state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorFeed {
    cursor: Option<i64>,
    exhausted: bool,
    loading: bool,
}

impl CursorFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the next cursor. `Some(None)` asks for the first page.
    pub fn next_request(&mut self) -> Option<Option<i64>> {
        if self.loading || self.exhausted {
            return None;
        }
        self.loading = true;
        Some(self.cursor)
    }

    pub fn complete<T>(&mut self, page: &CursorPage<T>) {
        self.loading = false;
        self.cursor = page.next_cursor;
        self.exhausted = !page.has_next || page.next_cursor.is_none();
    }

    pub fn fail(&mut self) {
        self.loading = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_more(&self) -> bool {
        !self.exhausted
    }
}

//! Offset pagination over in-memory sequences.
//!
//! Pages are 1-based. Requests outside `1..=total_pages` are not errors: they
//! produce an empty page whose neighbour flags still describe where the
//! caller could go next.

use serde::{Deserialize, Serialize};

/// Which page of a listing to show, and how many items a page holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: usize,
    /// Items per page. Fixed per listing context.
    pub page_size: usize,
}

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self { page, page_size }
    }

    pub fn first(page_size: usize) -> Self {
        Self::new(1, page_size)
    }

    /// Same page size, different page.
    pub fn with_page(self, page: usize) -> Self {
        Self { page, ..self }
    }
}

/// One page of a listing plus the metadata needed to render page controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// The page that was requested (may lie outside the valid range).
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    /// Transform the items while keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
            has_prev: self.has_prev,
            has_next: self.has_next,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the requested page lies within `1..=total_pages`.
    pub fn is_in_range(&self) -> bool {
        self.page >= 1 && self.page <= self.total_pages
    }
}

/// Slice `items` into the requested page.
///
/// Returns the contiguous range `[(page-1)*page_size, page*page_size)`
/// clamped to the input. A `page_size` of zero yields an empty page with
/// zero total pages.
pub fn paginate<T: Clone>(items: &[T], request: PageRequest) -> Page<T> {
    let PageRequest { page, page_size } = request;
    let total_items = items.len();
    let total_pages = if page_size == 0 {
        0
    } else {
        total_items.div_ceil(page_size)
    };

    let slice = if page >= 1 && page <= total_pages {
        let start = (page - 1) * page_size;
        let end = start.saturating_add(page_size).min(total_items);
        items[start..end].to_vec()
    } else {
        Vec::new()
    };

    Page {
        items: slice,
        page,
        page_size,
        total_items,
        total_pages,
        has_prev: page > 1,
        has_next: page < total_pages,
    }
}

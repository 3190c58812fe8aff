//! Page/limit pagination primitives shared by list endpoints.
//!
//! Every list endpoint accepts 1-based `page` and `limit` query
//! parameters and answers with the same envelope: the page of items,
//! the total page count (`ceil(total / limit)`), the current page, and
//! the total record count. This crate owns that arithmetic so handlers
//! and repositories agree on it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default page size applied when the caller omits `limit`.
pub const DEFAULT_LIMIT: u32 = 10;

/// Upper bound on `limit` to keep a single response bounded.
pub const MAX_LIMIT: u32 = 100;

/// Errors raised while validating pagination query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// `page` was zero; pages are 1-based.
    #[error("page must be at least 1")]
    PageOutOfRange,
    /// `limit` was zero.
    #[error("limit must be at least 1")]
    LimitOutOfRange,
}

/// Validated pagination request.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= limit <= MAX_LIMIT` (larger requests are clamped, zero is
///   rejected)
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let page = PageRequest::new(Some(2), Some(25)).expect("valid");
/// assert_eq!(page.offset(), 25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Build a request from optional query parameters, applying the
    /// default limit and clamping oversized limits.
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Result<Self, PageRequestError> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(PageRequestError::PageOutOfRange);
        }
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if limit == 0 {
            return Err(PageRequestError::LimitOutOfRange);
        }
        Ok(Self {
            page,
            limit: limit.min(MAX_LIMIT),
        })
    }

    /// 1-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Page size after clamping.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of records to skip before this page starts.
    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }
}

/// Response envelope carried by every list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Records on this page.
    pub items: Vec<T>,
    /// `ceil(total / limit)`.
    pub total_pages: u32,
    /// Echo of the requested page number.
    pub current_page: u32,
    /// Total records matching the filter across all pages.
    pub total: u64,
}

impl<T> Page<T> {
    /// Assemble an envelope from one page of items and the overall
    /// match count.
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total_pages: total_pages(total, request.limit()),
            current_page: request.page(),
            total,
        }
    }

    /// Map the item type while preserving the envelope.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_pages: self.total_pages,
            current_page: self.current_page,
            total: self.total,
        }
    }
}

/// Total page count for `total` records at `limit` per page.
///
/// Zero records yield zero pages.
pub fn total_pages(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    let pages = total.div_ceil(u64::from(limit));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 10, 0)]
    #[case(1, 10, 1)]
    #[case(10, 10, 1)]
    #[case(11, 10, 2)]
    #[case(25, 10, 3)]
    #[case(3, 1, 3)]
    fn total_pages_is_ceiling(#[case] total: u64, #[case] limit: u32, #[case] expected: u32) {
        assert_eq!(total_pages(total, limit), expected);
    }

    #[rstest]
    #[case(None, None, 1, DEFAULT_LIMIT)]
    #[case(Some(3), Some(20), 3, 20)]
    #[case(Some(1), Some(1_000), 1, MAX_LIMIT)]
    fn requests_apply_defaults_and_clamps(
        #[case] page: Option<u32>,
        #[case] limit: Option<u32>,
        #[case] expected_page: u32,
        #[case] expected_limit: u32,
    ) {
        let request = PageRequest::new(page, limit).expect("valid request");
        assert_eq!(request.page(), expected_page);
        assert_eq!(request.limit(), expected_limit);
    }

    #[test]
    fn zero_page_is_rejected() {
        assert_eq!(
            PageRequest::new(Some(0), None),
            Err(PageRequestError::PageOutOfRange)
        );
    }

    #[test]
    fn zero_limit_is_rejected() {
        assert_eq!(
            PageRequest::new(None, Some(0)),
            Err(PageRequestError::LimitOutOfRange)
        );
    }

    #[test]
    fn offset_skips_previous_pages() {
        let request = PageRequest::new(Some(4), Some(25)).expect("valid request");
        assert_eq!(request.offset(), 75);
    }

    #[test]
    fn envelope_reports_totals() {
        let request = PageRequest::new(Some(2), Some(2)).expect("valid request");
        let page = Page::new(vec!["c", "d"], 5, request);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.total, 5);
    }

    #[test]
    fn envelope_serialises_camel_case() {
        let request = PageRequest::default();
        let page = Page::new(vec![1, 2], 2, request);
        let value = serde_json::to_value(&page).expect("serialise");
        assert!(value.get("totalPages").is_some());
        assert!(value.get("currentPage").is_some());
    }
}

//! Offset pagination primitives shared by backend listing endpoints.
//!
//! A listing request carries a [`PageRequest`] (page number and page size),
//! which maps to a skip/limit window over an ordered result set. After the
//! store reports the total number of matching records, [`PageMeta`] derives
//! the metadata block returned alongside the page: page count, next/previous
//! flags, and the one-based index bounds of the window.
//!
//! The index bounds preserve the literal arithmetic of the listing contract:
//! `start_index = skip + 1` even when the requested page lies beyond the last
//! one, while `end_index` is capped at the total. Callers that want a clamped
//! presentation must do so at the rendering edge.

use serde::Serialize;

/// Validation errors raised when constructing a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// Page numbers are one-based.
    #[error("page must be greater than or equal to 1")]
    PageOutOfRange {
        /// The rejected page number.
        page: u32,
    },
    /// Page size must stay within the service window bounds.
    #[error("limit must be between {min} and {max}", min = PageRequest::MIN_LIMIT, max = PageRequest::MAX_LIMIT)]
    LimitOutOfRange {
        /// The rejected page size.
        limit: u32,
    },
}

/// A validated pagination window request.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(3, 10).expect("valid request");
/// assert_eq!(request.skip(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Page used when the client does not supply one.
    pub const DEFAULT_PAGE: u32 = 1;
    /// Page size used when the client does not supply one.
    pub const DEFAULT_LIMIT: u32 = 10;
    /// Smallest accepted page size.
    pub const MIN_LIMIT: u32 = 1;
    /// Largest accepted page size.
    pub const MAX_LIMIT: u32 = 100;

    /// Validate and construct a pagination request.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when `page` is zero or `limit` falls
    /// outside `[MIN_LIMIT, MAX_LIMIT]`.
    pub const fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page < 1 {
            return Err(PageRequestError::PageOutOfRange { page });
        }
        if limit < Self::MIN_LIMIT || limit > Self::MAX_LIMIT {
            return Err(PageRequestError::LimitOutOfRange { limit });
        }
        Ok(Self { page, limit })
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Number of records per page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of records skipped before the window starts.
    #[must_use]
    pub const fn skip(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Pagination metadata derived from a request and the total matching count.
///
/// Serialises in the camelCase envelope shape used by listing responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// One-based page number that was requested.
    pub current_page: u32,
    /// Total number of pages for the matching set; zero when it is empty.
    pub total_pages: u64,
    /// Total number of matching records, ignoring the window.
    pub total_items: u64,
    /// Requested page size.
    pub items_per_page: u32,
    /// Whether a later page exists.
    pub has_next_page: bool,
    /// Whether an earlier page exists.
    pub has_prev_page: bool,
    /// One-based index of the first slot in the window (`skip + 1`).
    pub start_index: u64,
    /// One-based index of the last record covered, capped at the total.
    pub end_index: u64,
}

impl PageMeta {
    /// Derive pagination metadata for `request` over `total_items` matches.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageMeta, PageRequest};
    ///
    /// let request = PageRequest::new(1, 10).expect("valid request");
    /// let meta = PageMeta::new(request, 25);
    /// assert_eq!(meta.total_pages, 3);
    /// assert!(meta.has_next_page);
    /// assert_eq!(meta.end_index, 10);
    /// ```
    #[must_use]
    pub const fn new(request: PageRequest, total_items: u64) -> Self {
        let limit = request.limit() as u64;
        let skip = request.skip();
        let total_pages = total_items.div_ceil(limit);
        let window_end = skip + limit;
        Self {
            current_page: request.page(),
            total_pages,
            total_items,
            items_per_page: request.limit(),
            has_next_page: (request.page() as u64) < total_pages,
            has_prev_page: request.page() > 1,
            start_index: skip + 1,
            end_index: if window_end < total_items {
                window_end
            } else {
                total_items
            },
        }
    }

    /// Number of records the window is expected to hold.
    ///
    /// Equals `min(limit, max(0, total_items - skip))`, so pages beyond the
    /// end of the set are empty rather than an error.
    #[must_use]
    pub const fn expected_window_len(&self) -> u64 {
        let skip = (self.current_page as u64 - 1) * self.items_per_page as u64;
        let remaining = self.total_items.saturating_sub(skip);
        if remaining < self.items_per_page as u64 {
            remaining
        } else {
            self.items_per_page as u64
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{PageMeta, PageRequest, PageRequestError};

    fn request(page: u32, limit: u32) -> PageRequest {
        PageRequest::new(page, limit).expect("valid request")
    }

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 10, 10)]
    #[case(3, 25, 50)]
    #[case(999, 10, 9980)]
    fn skip_is_page_minus_one_times_limit(#[case] page: u32, #[case] limit: u32, #[case] skip: u64) {
        assert_eq!(request(page, limit).skip(), skip);
    }

    #[rstest]
    fn zero_page_is_rejected() {
        let err = PageRequest::new(0, 10).expect_err("page 0 rejected");
        assert_eq!(err, PageRequestError::PageOutOfRange { page: 0 });
    }

    #[rstest]
    #[case(0)]
    #[case(101)]
    fn limit_outside_window_is_rejected(#[case] limit: u32) {
        let err = PageRequest::new(1, limit).expect_err("limit rejected");
        assert_eq!(err, PageRequestError::LimitOutOfRange { limit });
    }

    #[rstest]
    fn defaults_are_first_page_of_ten() {
        let request = PageRequest::default();
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), 10);
    }

    #[rstest]
    #[case(25, 10, 3)]
    #[case(30, 10, 3)]
    #[case(31, 10, 4)]
    #[case(1, 100, 1)]
    fn total_pages_is_ceiling_division(#[case] total: u64, #[case] limit: u32, #[case] pages: u64) {
        assert_eq!(PageMeta::new(request(1, limit), total).total_pages, pages);
    }

    #[rstest]
    fn empty_set_has_no_pages_and_zero_end_index() {
        let meta = PageMeta::new(request(1, 10), 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next_page);
        assert!(!meta.has_prev_page);
        assert_eq!(meta.start_index, 1);
        assert_eq!(meta.end_index, 0);
        assert_eq!(meta.expected_window_len(), 0);
    }

    #[rstest]
    fn middle_page_has_both_neighbours() {
        let meta = PageMeta::new(request(2, 10), 25);
        assert!(meta.has_next_page);
        assert!(meta.has_prev_page);
        assert_eq!(meta.start_index, 11);
        assert_eq!(meta.end_index, 20);
        assert_eq!(meta.expected_window_len(), 10);
    }

    #[rstest]
    fn final_partial_page_caps_end_index_at_total() {
        let meta = PageMeta::new(request(3, 10), 25);
        assert!(!meta.has_next_page);
        assert!(meta.has_prev_page);
        assert_eq!(meta.start_index, 21);
        assert_eq!(meta.end_index, 25);
        assert_eq!(meta.expected_window_len(), 5);
    }

    #[rstest]
    fn page_beyond_the_end_keeps_literal_start_index() {
        let meta = PageMeta::new(request(999, 10), 3);
        assert!(!meta.has_next_page);
        assert!(meta.has_prev_page);
        assert_eq!(meta.start_index, 9981);
        assert_eq!(meta.end_index, 3);
        assert_eq!(meta.expected_window_len(), 0);
    }

    #[rstest]
    fn exact_fit_has_no_next_page() {
        let meta = PageMeta::new(request(1, 10), 10);
        assert_eq!(meta.total_pages, 1);
        assert!(!meta.has_next_page);
        assert_eq!(meta.end_index, 10);
    }

    #[rstest]
    fn metadata_serialises_in_camel_case() {
        let meta = PageMeta::new(request(1, 10), 25);
        let value = serde_json::to_value(meta).expect("serialisable metadata");
        assert_eq!(value["currentPage"], 1);
        assert_eq!(value["totalPages"], 3);
        assert_eq!(value["totalItems"], 25);
        assert_eq!(value["itemsPerPage"], 10);
        assert_eq!(value["hasNextPage"], true);
        assert_eq!(value["hasPrevPage"], false);
        assert_eq!(value["startIndex"], 1);
        assert_eq!(value["endIndex"], 10);
    }
}

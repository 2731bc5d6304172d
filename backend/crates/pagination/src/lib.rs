//! Page-number pagination primitives shared by list endpoints.
//!
//! A [`PageRequest`] is validated once at the inbound boundary and then
//! handed to repositories, which translate it into `LIMIT`/`OFFSET`
//! clauses. Results travel back wrapped in a [`Page`] envelope that carries
//! the total item count so clients can render page controls.

use serde::{Deserialize, Serialize};

/// Smallest valid page number.
pub const FIRST_PAGE: u32 = 1;

/// Largest number of items a single page may contain.
pub const MAX_PER_PAGE: u32 = 100;

/// Errors raised when a page request is out of range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// The page number was zero.
    #[error("page must be at least {FIRST_PAGE}")]
    PageOutOfRange,
    /// The page size was zero or larger than [`MAX_PER_PAGE`].
    #[error("perPage must be between 1 and {MAX_PER_PAGE}, got {value}")]
    PerPageOutOfRange {
        /// Rejected page size.
        value: u32,
    },
}

/// Validated page-number request.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= per_page <= MAX_PER_PAGE`
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(3, 20).expect("valid page request");
/// assert_eq!(request.offset(), 40);
/// assert_eq!(request.limit(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Validate and construct a page request.
    ///
    /// # Errors
    /// Returns [`PaginationError`] when either value is out of range.
    pub const fn new(page: u32, per_page: u32) -> Result<Self, PaginationError> {
        if page < FIRST_PAGE {
            return Err(PaginationError::PageOutOfRange);
        }
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(PaginationError::PerPageOutOfRange { value: per_page });
        }
        Ok(Self { page, per_page })
    }

    /// Build a request from optional query values, falling back to the
    /// first page and the supplied default size.
    ///
    /// # Errors
    /// Returns [`PaginationError`] when a supplied value is out of range.
    pub fn from_parts(
        page: Option<u32>,
        per_page: Option<u32>,
        default_per_page: u32,
    ) -> Result<Self, PaginationError> {
        Self::new(
            page.unwrap_or(FIRST_PAGE),
            per_page.unwrap_or(default_per_page),
        )
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Number of items per page.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of items to skip before this page starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.per_page as u64
    }

    /// Maximum number of items on this page.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.per_page as u64
    }
}

/// One page of results plus the data needed to navigate the rest.
///
/// Serialises as
/// `{"items": [...], "total": 41, "pages": 3, "currentPage": 1, "perPage": 20}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, in listing order.
    pub items: Vec<T>,
    /// Total number of items matching the listing filters.
    pub total: u64,
    /// Total number of pages for the current page size.
    pub pages: u64,
    /// One-based page number of this page.
    pub current_page: u32,
    /// Page size used to build this page.
    pub per_page: u32,
}

impl<T> Page<T> {
    /// Assemble a page from its items, the filtered total, and the request
    /// that produced it.
    ///
    /// # Examples
    /// ```
    /// use pagination::{Page, PageRequest};
    ///
    /// let request = PageRequest::new(1, 2).expect("valid page request");
    /// let page = Page::new(vec!["a", "b"], 5, request);
    /// assert_eq!(page.pages, 3);
    /// ```
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            pages: total.div_ceil(request.per_page as u64),
            current_page: request.page,
            per_page: request.per_page,
        }
    }

    /// Convert every item while keeping the navigation data.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            pages: self.pages,
            current_page: self.current_page,
            per_page: self.per_page,
        }
    }
}

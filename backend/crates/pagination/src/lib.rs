//! Page-number pagination primitives shared by the Foodgram HTTP adapters.
//!
//! A [`PageParams`] value is deserialised straight from the query string and
//! validated into a [`PageRequest`]. Repositories answer with a [`Page`]
//! holding one slice of items plus the total number of matching rows, and
//! [`Paginated`] renders the JSON envelope clients receive:
//!
//! ```json
//! {"count": 12, "next": "http://host/api/recipes?page=3&limit=5",
//!  "previous": "http://host/api/recipes?page=1&limit=5", "results": [...]}
//! ```

use serde::{Deserialize, Serialize};
use url::Url;

/// Page size used when the client does not send `limit`.
pub const DEFAULT_LIMIT: u32 = 5;

/// Largest page size a client may request.
pub const MAX_LIMIT: u32 = 100;

/// Raw pagination query parameters as sent by clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PageParams {
    /// One-based page number.
    pub page: Option<u32>,
    /// Requested page size.
    pub limit: Option<u32>,
}

/// Errors raised while validating pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageParamsError {
    /// `page` was zero.
    #[error("page must be at least 1")]
    ZeroPage,
    /// `limit` was zero.
    #[error("limit must be at least 1")]
    ZeroLimit,
}

impl PageParamsError {
    /// Name of the query parameter that failed validation.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::ZeroPage => "page",
            Self::ZeroLimit => "limit",
        }
    }
}

/// A validated request for one page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Build a request, clamping `limit` to [`MAX_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns [`PageParamsError`] when either value is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let request = PageRequest::new(2, 500).expect("valid request");
    /// assert_eq!(request.limit(), 100);
    /// assert_eq!(request.offset(), 100);
    /// ```
    pub fn new(page: u32, limit: u32) -> Result<Self, PageParamsError> {
        if page == 0 {
            return Err(PageParamsError::ZeroPage);
        }
        if limit == 0 {
            return Err(PageParamsError::ZeroLimit);
        }
        Ok(Self {
            page,
            limit: limit.min(MAX_LIMIT),
        })
    }

    /// The first page with the default page size.
    #[must_use]
    pub const fn first() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Number of items per page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip before this page starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

impl TryFrom<PageParams> for PageRequest {
    type Error = PageParamsError;

    fn try_from(params: PageParams) -> Result<Self, Self::Error> {
        Self::new(
            params.page.unwrap_or(1),
            params.limit.unwrap_or(DEFAULT_LIMIT),
        )
    }
}

/// One page of items together with the total number of matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Number of items across every page.
    pub total: u64,
}

impl<T> Page<T> {
    /// Bundle a slice of items with the overall total.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    /// An empty page.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }

    /// Transform every item, keeping the total.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }

    /// Slice an in-memory collection according to `request`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::{Page, PageRequest};
    ///
    /// let request = PageRequest::new(2, 2).expect("valid request");
    /// let page = Page::from_slice(vec![1, 2, 3, 4, 5], request);
    /// assert_eq!(page.items, vec![3, 4]);
    /// assert_eq!(page.total, 5);
    /// ```
    #[must_use]
    pub fn from_slice(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as u64;
        let skip = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(request.limit()).unwrap_or(usize::MAX);
        Self {
            items: all.into_iter().skip(skip).take(take).collect(),
            total,
        }
    }
}

/// Pagination envelope serialised in list responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paginated<T> {
    /// Total number of matching items.
    pub count: u64,
    /// Absolute link to the next page, if any.
    pub next: Option<String>,
    /// Absolute link to the previous page, if any.
    pub previous: Option<String>,
    /// Items on the current page.
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// Wrap `page` in an envelope whose links are derived from `base`.
    ///
    /// `base` is the absolute URL of the current request. Its existing query
    /// parameters are preserved apart from `page` and `limit`, which are
    /// rewritten for each link.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::{Page, PageRequest, Paginated};
    /// use url::Url;
    ///
    /// let base = Url::parse("http://localhost/api/users?page=1").expect("url");
    /// let request = PageRequest::new(1, 2).expect("valid request");
    /// let envelope = Paginated::from_page(Page::new(vec!["a", "b"], 3), request, &base);
    /// assert_eq!(
    ///     envelope.next.as_deref(),
    ///     Some("http://localhost/api/users?page=2&limit=2")
    /// );
    /// assert!(envelope.previous.is_none());
    /// ```
    #[must_use]
    pub fn from_page(page: Page<T>, request: PageRequest, base: &Url) -> Self {
        let seen = request.offset() + page.items.len() as u64;
        let next = (seen < page.total).then(|| page_link(base, request.page() + 1, request));
        let previous = (request.page() > 1).then(|| page_link(base, request.page() - 1, request));
        Self {
            count: page.total,
            next,
            previous,
            results: page.items,
        }
    }
}

fn page_link(base: &Url, page: u32, request: PageRequest) -> String {
    let mut link = base.clone();
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != "page" && key != "limit")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    {
        let mut pairs = link.query_pairs_mut();
        pairs.clear();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        pairs.append_pair("page", &page.to_string());
        pairs.append_pair("limit", &request.limit().to_string());
    }
    link.into()
}

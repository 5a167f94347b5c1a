//! Pagination links for list endpoints.

use crate::envelope::Links;
use crate::request::{ListRequest, PAGE_NUMBER_PARAM, PAGE_SIZE_PARAM};

impl Links {
    /// Build `self`/`first`/`last`/`prev`/`next` for a paged listing of
    /// `total` records.
    ///
    /// `base` is the endpoint path, optionally with its own query string
    /// (e.g. filters) that should be carried across pages. Any
    /// `page[number]`/`page[size]` already in `base` are replaced, so the
    /// request URI can be passed as is.
    ///
    /// # Example
    ///
    /// ```rust
    /// use jsonapi_axum_core::{Links, ListRequest, PaginationConfig};
    ///
    /// let req = ListRequest::parse("page[number]=2&page[size]=10", None, &PaginationConfig::default()).unwrap();
    /// let links = Links::paginate("/articles", &req, 35);
    ///
    /// assert_eq!(links.self_, "/articles?page[number]=2&page[size]=10");
    /// assert_eq!(links.last, "/articles?page[number]=4&page[size]=10");
    /// assert_eq!(links.prev, "/articles?page[number]=1&page[size]=10");
    /// assert_eq!(links.next, "/articles?page[number]=3&page[size]=10");
    /// ```
    pub fn paginate(base: &str, request: &ListRequest, total: i64) -> Self {
        let size = request.page_size.max(1);
        let current = request.page_number.max(1);
        let total = u64::try_from(total).unwrap_or(0);
        let last = total.div_ceil(size).max(1);

        let prefix = page_prefix(base);
        let page =
            |number: u64| format!("{prefix}{PAGE_NUMBER_PARAM}={number}&{PAGE_SIZE_PARAM}={size}");

        Self {
            self_: page(current),
            first: page(1),
            last: page(last),
            prev: if current > 1 {
                page((current - 1).min(last))
            } else {
                String::new()
            },
            next: if current < last {
                page(current + 1)
            } else {
                String::new()
            },
        }
    }
}

/// `base` up to and including the separator the page parameters follow,
/// with existing page parameters removed.
fn page_prefix(base: &str) -> String {
    let (path, query) = base.split_once('?').unwrap_or((base, ""));
    let mut prefix = format!("{path}?");
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let is_page_param = url::form_urlencoded::parse(pair.as_bytes())
            .next()
            .is_some_and(|(key, _)| key == PAGE_NUMBER_PARAM || key == PAGE_SIZE_PARAM);
        if !is_page_param {
            prefix.push_str(pair);
            prefix.push('&');
        }
    }
    prefix
}

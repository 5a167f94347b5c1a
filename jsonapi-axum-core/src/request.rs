//! Query string parsing for list endpoints.
//!
//! Recognized parameters:
//!
//! | parameter         | field                          |
//! |-------------------|--------------------------------|
//! | `page[number]`    | [`ListRequest::page_number`]   |
//! | `page[size]`      | [`ListRequest::page_size`]     |
//! | `sort`            | [`ListRequest::sort`]          |
//! | `filter[<name>]`  | [`ListRequest::filter`]        |
//! | `device`          | [`ListRequest::device`]        |
//! | `callback`        | [`ListRequest::callback`]      |
//!
//! Parsing never fails on malformed numbers; they fall back to defaults.
//! The only hard failure is a `callback` that is not a JavaScript variable path.

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ParseIdsError, RequestError};
use crate::ids::parse_ids;

static VALID_CALLBACK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z$_][a-zA-Z0-9$_]*(\.[a-zA-Z$_][a-zA-Z0-9$_]*)*$")
        .expect("callback pattern is valid")
});

static FILTER_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^filter\[([^\]]+?)\]$").expect("filter pattern is valid"));

pub const PAGE_NUMBER_PARAM: &str = "page[number]";
pub const PAGE_SIZE_PARAM: &str = "page[size]";
pub const SORT_PARAM: &str = "sort";
pub const DEVICE_PARAM: &str = "device";
pub const CALLBACK_PARAM: &str = "callback";

/// Default header carrying the authenticated user's numeric id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Bounds applied to `page[size]`.
///
/// # Example
///
/// ```rust
/// use jsonapi_axum_core::PaginationConfig;
///
/// // Missing or invalid sizes become 20, anything above 100 is clamped
/// let config = PaginationConfig::new()
///     .default_page_size(20)
///     .max_page_size(100);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaginationConfig {
    default_page_size: u64,
    max_page_size: Option<u64>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 1,
            max_page_size: None,
        }
    }
}

impl PaginationConfig {
    /// Default size 1, no maximum.
    pub fn new() -> Self {
        Self::default()
    }

    /// Size used when `page[size]` is missing, invalid or below 1.
    ///
    /// A value of 0 is treated as 1.
    pub fn default_page_size(mut self, size: u64) -> Self {
        self.default_page_size = size.max(1);
        self
    }

    /// Upper bound for `page[size]`. Larger requests are clamped.
    pub fn max_page_size(mut self, max: u64) -> Self {
        self.max_page_size = Some(max.max(1));
        self
    }

    pub fn get_default_page_size(&self) -> u64 {
        match self.max_page_size {
            Some(max) => self.default_page_size.min(max),
            None => self.default_page_size,
        }
    }

    pub fn get_max_page_size(&self) -> Option<u64> {
        self.max_page_size
    }

    /// Resolve a raw `page[size]` value.
    pub fn resolve_page_size(&self, raw: Option<&str>) -> u64 {
        let size = match parse_int(raw) {
            Some(n) if n >= 1 => n as u64,
            _ => return self.get_default_page_size(),
        };
        match self.max_page_size {
            Some(max) if size > max => max,
            _ => size,
        }
    }
}

/// Sort direction of a [`SortKey`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// One entry of the `sort` parameter. A leading `-` means descending.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortKey<'a> {
    pub field: &'a str,
    pub direction: Direction,
}

impl<'a> SortKey<'a> {
    pub fn parse(raw: &'a str) -> Self {
        match raw.strip_prefix('-') {
            Some(field) => Self {
                field,
                direction: Direction::Descending,
            },
            None => Self {
                field: raw,
                direction: Direction::Ascending,
            },
        }
    }
}

/// A parsed list request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListRequest {
    /// Caller id from the user id header, 0 when absent or not a number.
    pub user_id: i64,
    /// Distinct sort fields in request order.
    pub sort: Vec<String>,
    /// Filter name to its comma separated values.
    pub filter: BTreeMap<String, Vec<String>>,
    pub device: String,
    /// JSON-P callback, empty when not requested.
    pub callback: String,
    /// 1-based page number.
    pub page_number: u64,
    pub page_size: u64,
    pub page_limit: u64,
    pub page_offset: u64,
}

impl Default for ListRequest {
    fn default() -> Self {
        Self {
            user_id: 0,
            sort: Vec::new(),
            filter: BTreeMap::new(),
            device: String::new(),
            callback: String::new(),
            page_number: 1,
            page_size: 1,
            page_limit: 1,
            page_offset: 0,
        }
    }
}

impl ListRequest {
    /// Parse a raw (still percent-encoded) query string.
    ///
    /// `user_id` is the value of the user id header, if any.
    ///
    /// # Example
    ///
    /// ```rust
    /// use jsonapi_axum_core::{ListRequest, PaginationConfig};
    ///
    /// let req = ListRequest::parse(
    ///     "page[number]=3&page[size]=10&sort=-created,title&filter[tag]=rust,web",
    ///     Some("42"),
    ///     &PaginationConfig::default(),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(req.user_id, 42);
    /// assert_eq!(req.page_offset, 20);
    /// assert_eq!(req.sort, vec!["-created", "title"]);
    /// assert_eq!(req.filter_values("tag"), ["rust", "web"]);
    /// ```
    pub fn parse(
        query: &str,
        user_id: Option<&str>,
        pagination: &PaginationConfig,
    ) -> Result<Self, RequestError> {
        let params = QueryParams::parse(query);

        let callback = params.get(CALLBACK_PARAM).unwrap_or_default().to_string();
        if !callback.is_empty() && !is_valid_callback(&callback) {
            return Err(RequestError::InvalidCallback(callback));
        }

        let page_number = match parse_int(params.get(PAGE_NUMBER_PARAM)) {
            Some(n) if n >= 1 => n as u64,
            _ => 1,
        };
        let page_size = pagination.resolve_page_size(params.get(PAGE_SIZE_PARAM));

        Ok(Self {
            user_id: parse_int(user_id).unwrap_or(0),
            sort: parse_sort(params.get(SORT_PARAM).unwrap_or_default()),
            filter: params.filters(),
            device: params.get(DEVICE_PARAM).unwrap_or_default().to_string(),
            callback,
            page_number,
            page_size,
            page_limit: page_size,
            page_offset: page_size.saturating_mul(page_number - 1),
        })
    }

    /// First value of a filter, or `""` when the filter is absent.
    pub fn filter_str(&self, name: &str) -> &str {
        self.filter
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// First value of a filter as an integer, 0 when absent or not a number.
    pub fn filter_int(&self, name: &str) -> i64 {
        self.filter_str(name).parse().unwrap_or(0)
    }

    /// `true` when [`filter_int`](Self::filter_int) is positive.
    pub fn filter_bool(&self, name: &str) -> bool {
        self.filter_int(name) > 0
    }

    /// All values of a filter.
    pub fn filter_values(&self, name: &str) -> &[String] {
        self.filter.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Filter values as a list of ids, see [`parse_ids`].
    pub fn filter_ids(&self, name: &str) -> Result<Vec<i64>, ParseIdsError> {
        parse_ids(&self.filter_values(name).join(","))
    }

    /// The sort fields with their direction. Empty fields are skipped.
    pub fn sort_keys(&self) -> impl Iterator<Item = SortKey<'_>> {
        self.sort
            .iter()
            .map(|s| SortKey::parse(s))
            .filter(|key| !key.field.is_empty())
    }

    /// Whether the response should be wrapped in a JSON-P call.
    pub fn is_jsonp(&self) -> bool {
        !self.callback.is_empty()
    }
}

/// Whether `name` is a dotted JavaScript identifier path such as `jQuery.cb_1`.
pub fn is_valid_callback(name: &str) -> bool {
    VALID_CALLBACK.is_match(name)
}

/// Decoded query pairs where the first occurrence of a key wins.
struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    fn parse(query: &str) -> Self {
        let mut seen = HashSet::new();
        let pairs = url::form_urlencoded::parse(query.as_bytes())
            .filter(|(k, _)| seen.insert(k.to_string()))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn filters(&self) -> BTreeMap<String, Vec<String>> {
        let mut filters = BTreeMap::new();
        for (key, value) in &self.pairs {
            if value.is_empty() {
                continue;
            }
            if let Some(name) = FILTER_KEY.captures(key).and_then(|c| c.get(1)) {
                let values = value.split(',').map(str::to_string).collect();
                filters.insert(name.as_str().to_string(), values);
            }
        }
        filters
    }
}

fn parse_sort(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    let mut seen = HashSet::new();
    raw.split(',')
        .filter(|field| seen.insert(*field))
        .map(str::to_string)
        .collect()
}

fn parse_int(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.parse().ok())
}

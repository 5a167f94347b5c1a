//! The uniform response envelope.
//!
//! Every endpoint answers with the same top-level object:
//!
//! ```json
//! {
//!   "links": {"self": "/articles?page[number]=2&page[size]=10"},
//!   "meta": {"process_time": 0.0012, "total_data": 42},
//!   "data": [ ... ],
//!   "errors": [{"code": "HTTP404", "title": "Not Found", "detail": "Not Found"}]
//! }
//! ```
//!
//! `links` and `meta` are always present, `data` only when set and `errors`
//! only when non-empty.

use std::time::Duration;

use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Response envelope wrapping an optional payload of type `T`.
///
/// The `callback` is never serialized. When non-empty, the HTTP layer wraps
/// the JSON body in a JSON-P function call with that name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = ()> {
    #[serde(skip)]
    pub callback: String,
    #[serde(default)]
    pub links: Links,
    #[serde(default)]
    pub meta: Meta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorObject>,
}

impl<T> Envelope<T> {
    /// Create an empty envelope.
    pub fn new() -> Self {
        Self {
            callback: String::new(),
            links: Links::default(),
            meta: Meta::default(),
            data: None,
            errors: Vec::new(),
        }
    }

    /// Set the payload.
    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    /// Set the JSON-P callback name.
    pub fn with_callback<S: Into<String>>(mut self, callback: S) -> Self {
        self.callback = callback.into();
        self
    }

    /// Set the links object.
    pub fn with_links(mut self, links: Links) -> Self {
        self.links = links;
        self
    }

    /// Set the meta object.
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Append an error object.
    pub fn add_error<C, S, D>(&mut self, code: C, title: S, detail: D)
    where
        C: Into<String>,
        S: Into<String>,
        D: Into<String>,
    {
        self.errors.push(ErrorObject::new(code, title, detail));
    }

    /// Remove all error objects.
    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    /// Whether any error object has been added.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Whether the HTTP layer should wrap this envelope in a JSON-P call.
    pub fn is_jsonp(&self) -> bool {
        !self.callback.is_empty()
    }
}

impl Envelope<()> {
    /// Envelope holding the single standard error object for `status`.
    pub fn from_status(status: StatusCode) -> Self {
        let mut envelope = Self::new();
        envelope.errors.push(ErrorObject::from_status(status));
        envelope
    }
}

/// Bookkeeping about the response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Seconds spent producing the response.
    pub process_time: f64,
    /// Total number of records matching the request, across all pages.
    pub total_data: i64,
}

impl Meta {
    pub fn new(total_data: i64) -> Self {
        Self {
            process_time: 0.0,
            total_data,
        }
    }

    /// Record the processing time in fractional seconds.
    pub fn with_process_time(mut self, elapsed: Duration) -> Self {
        self.process_time = elapsed.as_secs_f64();
        self
    }
}

/// Navigation links. Empty links are omitted from the output.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    #[serde(rename = "self", default, skip_serializing_if = "String::is_empty")]
    pub self_: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub first: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub next: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prev: String,
}

/// A single error entry in the envelope's `errors` list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: String,
    pub title: String,
    pub detail: String,
}

impl ErrorObject {
    pub fn new<C, S, D>(code: C, title: S, detail: D) -> Self
    where
        C: Into<String>,
        S: Into<String>,
        D: Into<String>,
    {
        Self {
            code: code.into(),
            title: title.into(),
            detail: detail.into(),
        }
    }

    /// The standard error for an HTTP status: code `HTTP<status>` with the
    /// reason phrase as both title and detail.
    ///
    /// ```
    /// use http::StatusCode;
    /// use jsonapi_axum_core::ErrorObject;
    ///
    /// let err = ErrorObject::from_status(StatusCode::NOT_FOUND);
    /// assert_eq!(err.code, "HTTP404");
    /// assert_eq!(err.title, "Not Found");
    /// assert_eq!(err.detail, "Not Found");
    /// ```
    pub fn from_status(status: StatusCode) -> Self {
        let reason = status_text(status);
        Self::new(status_code_string(status), reason, reason)
    }

    /// Like [`from_status`](Self::from_status) with a custom detail.
    pub fn from_status_with_detail<D: Into<String>>(status: StatusCode, detail: D) -> Self {
        Self::new(status_code_string(status), status_text(status), detail)
    }
}

/// `HTTP<status>`, e.g. `HTTP500`.
pub fn status_code_string(status: StatusCode) -> String {
    format!("HTTP{}", status.as_u16())
}

/// The canonical reason phrase, or an empty string for unknown statuses.
pub fn status_text(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("")
}

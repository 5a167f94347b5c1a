//! Router-wide settings.
//!
//! Set once when the router is built and copied into every request by
//! [`ApiLayer`](crate::layer::ApiLayer).

use axum::http::HeaderName;
use jsonapi_axum_core::{PaginationConfig, USER_ID_HEADER};

/// Default maximum size of a JSON request body (2 MB, same as axum's `Json`).
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Configuration shared by the extractors and error handlers.
///
/// # Example
///
/// ```rust
/// use jsonapi_axum::{ApiConfig, PaginationConfig};
///
/// let config = ApiConfig::new()
///     .debug(true)
///     .pagination(PaginationConfig::new().default_page_size(20).max_page_size(100))
///     .body_limit(64 * 1024);
/// ```
#[derive(Clone, Debug)]
pub struct ApiConfig {
    debug: bool,
    pagination: PaginationConfig,
    body_limit: usize,
    user_id_header: HeaderName,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            debug: false,
            pagination: PaginationConfig::default(),
            body_limit: DEFAULT_BODY_LIMIT,
            user_id_header: HeaderName::from_static(USER_ID_HEADER),
        }
    }
}

impl ApiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// When enabled, panic responses carry the panic message as error detail.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    /// Maximum accepted size of a [`JsonBody`](crate::extract::JsonBody) in bytes.
    pub fn body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    /// Header read into [`ListRequest::user_id`](jsonapi_axum_core::ListRequest::user_id).
    pub fn user_id_header(mut self, name: HeaderName) -> Self {
        self.user_id_header = name;
        self
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn get_pagination(&self) -> &PaginationConfig {
        &self.pagination
    }

    pub fn get_body_limit(&self) -> usize {
        self.body_limit
    }

    pub fn get_user_id_header(&self) -> &HeaderName {
        &self.user_id_header
    }
}

//! # jsonapi-axum
//!
//! Helpers for building JSON-API style HTTP services with
//! [Axum](https://github.com/tokio-rs/axum).
//!
//! ## Features
//!
//! - **List queries:** [`ApiQuery`](extract::ApiQuery) parses `page[number]`, `page[size]`,
//!   `sort`, `filter[name]`, `device`, `callback` and the `X-User-ID` header.
//! - **Uniform envelope:** handlers return [`ApiResponse`](response::ApiResponse), rendered as
//!   `{"links": .., "meta": .., "data": .., "errors": ..}`, wrapped in a JSON-P call when the
//!   request asked for a callback.
//! - **Standard errors:** [`ApiError`](error::ApiError) plus not-found, method-not-allowed
//!   and panic handlers that all answer with the same envelope.
//!
//! ## Getting Started
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use jsonapi_axum::prelude::*;
//!
//! async fn list(ApiQuery(req): ApiQuery, start: RequestStart) -> ApiResponse<Vec<String>> {
//!     let items = vec!["a".to_string()];
//!     Envelope::new()
//!         .with_data(items)
//!         .with_meta(Meta::new(1).with_process_time(start.elapsed()))
//!         .with_callback(req.callback)
//!         .into()
//! }
//!
//! let app = jsonapi_axum::with_defaults(Router::new().route("/items", get(list)), ApiConfig::new());
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod layer;
pub mod response;

pub use config::ApiConfig;
pub use error::ApiError;
pub use extract::{ApiQuery, JsonBody};
pub use handlers::{PanicHandler, method_not_allowed, not_found, with_defaults};
pub use layer::{ApiLayer, ApiService, RequestStart};
pub use response::ApiResponse;

// Re-export the core types
pub use jsonapi_axum_core;
pub use jsonapi_axum_core::{
    Direction, Envelope, ErrorObject, Links, ListRequest, Meta, PaginationConfig, ParseIdsError,
    RequestError, SortKey, parse_ids,
};

pub mod prelude {
    //! A prelude for `jsonapi-axum` providing the most common types.
    pub use crate::config::ApiConfig;
    pub use crate::error::ApiError;
    pub use crate::extract::{ApiQuery, JsonBody};
    pub use crate::layer::RequestStart;
    pub use crate::response::ApiResponse;
    pub use jsonapi_axum_core::{Envelope, Links, ListRequest, Meta, PaginationConfig};
}

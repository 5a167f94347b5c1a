//! Ready-made handlers for unmatched routes, wrong methods and panics.
//!
//! [`with_defaults`] installs all of them, together with [`ApiLayer`], on a
//! router:
//!
//! ```rust,ignore
//! let app = jsonapi_axum::with_defaults(
//!     Router::new().route("/articles", get(list_articles)),
//!     ApiConfig::new().debug(cfg!(debug_assertions)),
//! );
//! ```

use axum::{Router, body::Body, http::StatusCode, response::Response};
use std::any::Any;
use tower_http::catch_panic::{CatchPanicLayer, ResponseForPanic};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::layer::ApiLayer;

/// Fallback handler answering `404 Not Found` with the error envelope.
pub async fn not_found() -> ApiError {
    ApiError::not_found()
}

/// Handler answering `405 Method Not Allowed` with the error envelope.
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

/// Turns a handler panic into a `500 Internal Server Error` envelope.
///
/// In debug mode the panic message becomes the error detail; otherwise the
/// detail is the generic reason phrase.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicHandler {
    debug: bool,
}

impl PanicHandler {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }
}

impl ResponseForPanic for PanicHandler {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response<Body> {
        let message = panic_message(err.as_ref());
        tracing::error!(panic = %message, "handler panicked");

        let err = if self.debug {
            ApiError::with_detail(StatusCode::INTERNAL_SERVER_ERROR, message)
        } else {
            ApiError::internal()
        };
        axum::response::IntoResponse::into_response(err)
    }
}

fn panic_message(err: &(dyn Any + Send)) -> String {
    if let Some(s) = err.downcast_ref::<&'static str>() {
        s.to_string()
    } else if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Install the standard fallbacks, [`ApiLayer`] and panic catching on `router`.
pub fn with_defaults<S>(router: Router<S>, config: ApiConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let panic_handler = PanicHandler::new(config.is_debug());
    router
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(ApiLayer::new(config))
        .layer(CatchPanicLayer::custom(panic_handler))
}

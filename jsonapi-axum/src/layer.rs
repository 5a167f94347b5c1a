//! Middleware that makes [`ApiConfig`] available to the extractors.
//!
//! ```rust,ignore
//! use jsonapi_axum::{ApiConfig, ApiLayer};
//!
//! let app = Router::new()
//!     .route("/articles", get(list_articles))
//!     .layer(ApiLayer::new(ApiConfig::new().debug(true)));
//! ```
//!
//! Requests that did not pass through the layer still work: the extractors
//! fall back to [`ApiConfig::default`] and log a warning once.

use axum::http::Request;
use std::{
    sync::Arc,
    task::{Context, Poll},
    time::Instant,
};
use tower::{Layer, Service};

use crate::config::ApiConfig;

/// Instant at which [`ApiLayer`] received the request.
///
/// Stored in request extensions and available as an extractor, so handlers
/// can fill `meta.process_time`.
#[derive(Clone, Copy, Debug)]
pub struct RequestStart(pub Instant);

impl RequestStart {
    pub fn now() -> Self {
        Self(Instant::now())
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.0.elapsed()
    }
}

/// Layer that stores the router's [`ApiConfig`] and a [`RequestStart`] in
/// each request's extensions.
#[derive(Debug, Clone, Default)]
pub struct ApiLayer {
    config: Arc<ApiConfig>,
}

impl ApiLayer {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

impl<S> Layer<S> for ApiLayer {
    type Service = ApiService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ApiService {
            inner,
            config: self.config.clone(),
        }
    }
}

/// Service produced by [`ApiLayer`].
#[derive(Debug, Clone)]
pub struct ApiService<S> {
    inner: S,
    config: Arc<ApiConfig>,
}

impl<S, B> Service<Request<B>> for ApiService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        let extensions = req.extensions_mut();
        extensions.insert(self.config.clone());
        extensions.insert(RequestStart::now());
        self.inner.call(req)
    }
}

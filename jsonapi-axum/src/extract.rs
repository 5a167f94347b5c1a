//! Extractors for list queries and JSON bodies.
use axum::{
    extract::{FromRequest, FromRequestParts, Request},
    http::{StatusCode, request::Parts},
};
use http_body_util::LengthLimitError;
use jsonapi_axum_core::ListRequest;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::layer::RequestStart;

// Flag to ensure we only log the missing layer warning once per process
static WARNED_MISSING_LAYER: AtomicBool = AtomicBool::new(false);

/// Get the config from request extensions, or the default one if missing.
fn config_or_default(extensions: &axum::http::Extensions) -> Arc<ApiConfig> {
    if let Some(config) = extensions.get::<Arc<ApiConfig>>() {
        return config.clone();
    }

    warn_missing_layer();
    Arc::new(ApiConfig::default())
}

/// Logs the missing layer warning on the first call only. Returns whether
/// this call logged it.
fn warn_missing_layer() -> bool {
    if WARNED_MISSING_LAYER.swap(true, Ordering::Relaxed) {
        return false;
    }
    tracing::warn!(
        target: "jsonapi_axum",
        "ApiLayer not found. Using default configuration."
    );
    true
}

/// Parsed list query: pagination, sort, filters, device, callback and the
/// caller's user id.
///
/// Rejects with `400 Bad Request` when the `callback` parameter is not a
/// valid JavaScript variable path.
///
/// # Example
///
/// ```rust,ignore
/// async fn list(ApiQuery(req): ApiQuery) -> ApiResponse<Vec<Article>> {
///     let page = store.page(req.page_offset, req.page_limit, &req.sort);
///     Envelope::new().with_data(page).with_callback(req.callback).into()
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiQuery(pub ListRequest);

impl ApiQuery {
    pub fn into_inner(self) -> ListRequest {
        self.0
    }
}

impl<S> FromRequestParts<S> for ApiQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let config = config_or_default(&parts.extensions);

        let query = parts.uri.query().unwrap_or("");
        let user_id = parts
            .headers
            .get(config.get_user_id_header())
            .and_then(|v| v.to_str().ok());

        let request = ListRequest::parse(query, user_id, config.get_pagination()).map_err(|err| {
            tracing::debug!(error = %err, query, "rejected list request");
            ApiError::from(err)
        })?;

        tracing::debug!(
            user_id = request.user_id,
            page_number = request.page_number,
            page_size = request.page_size,
            sort = ?request.sort,
            filters = request.filter.len(),
            "parsed list request"
        );
        Ok(ApiQuery(request))
    }
}

/// JSON request body decoded into `T`.
///
/// The body size is bounded by [`ApiConfig::body_limit`]; larger bodies are
/// rejected with `413 Payload Too Large`. Bodies that fail to decode are
/// rejected with `400 Bad Request` carrying the decoder's message.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T> JsonBody<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let config = config_or_default(req.extensions());
        let limit = config.get_body_limit();

        let bytes = axum::body::to_bytes(req.into_body(), limit)
            .await
            .map_err(|err| {
                let err = err.into_inner();
                if err.downcast_ref::<LengthLimitError>().is_some() {
                    ApiError::with_detail(
                        StatusCode::PAYLOAD_TOO_LARGE,
                        format!("request body exceeds maximum allowed size of {limit} bytes"),
                    )
                } else {
                    ApiError::bad_request(err.to_string())
                }
            })?;

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|err| ApiError::bad_request(err.to_string()))
    }
}

impl<S> FromRequestParts<S> for RequestStart
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestStart>()
            .copied()
            .unwrap_or_else(RequestStart::now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::ApiLayer;
    use axum::{Router, body::Body, routing::get, routing::post};
    use http_body_util::BodyExt;
    use jsonapi_axum_core::PaginationConfig;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[test]
    fn test_missing_layer_warns_once() {
        let config = config_or_default(&axum::http::Extensions::new());
        assert_eq!(config.get_body_limit(), ApiConfig::default().get_body_limit());
        assert!(WARNED_MISSING_LAYER.load(Ordering::Relaxed));

        config_or_default(&axum::http::Extensions::new());
        assert!(!warn_missing_layer());
    }

    #[test]
    fn test_layer_config_does_not_warn() {
        let mut extensions = axum::http::Extensions::new();
        extensions.insert(Arc::new(ApiConfig::new().debug(true)));
        assert!(config_or_default(&extensions).is_debug());
    }

    async fn echo_query(ApiQuery(req): ApiQuery) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}",
            req.user_id,
            req.page_number,
            req.page_size,
            req.page_offset,
            req.sort.join(","),
            req.filter_str("tag")
        )
    }

    #[derive(Deserialize)]
    struct Greeting {
        name: String,
    }

    async fn greet(JsonBody(g): JsonBody<Greeting>) -> String {
        format!("hello {}", g.name)
    }

    fn app(config: ApiConfig) -> Router {
        Router::new()
            .route("/items", get(echo_query))
            .route("/greet", post(greet))
            .layer(ApiLayer::new(config))
    }

    async fn send(router: Router, req: Request) -> (StatusCode, String) {
        let resp = router.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_query_extraction() {
        let req = Request::builder()
            .uri("/items?page[number]=3&page[size]=10&sort=a,-b,a&filter[tag]=x,y")
            .header("x-user-id", "77")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(ApiConfig::default()), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "77|3|10|20|a,-b|x");
    }

    #[tokio::test]
    async fn test_query_uses_layer_config() {
        let config = ApiConfig::new()
            .pagination(PaginationConfig::new().default_page_size(15).max_page_size(30))
            .user_id_header(axum::http::HeaderName::from_static("x-account"));
        let req = Request::builder()
            .uri("/items?page[size]=100")
            .header("x-account", "5")
            .body(Body::empty())
            .unwrap();
        let (_, body) = send(app(config), req).await;
        assert_eq!(body, "5|1|30|0||");
    }

    #[tokio::test]
    async fn test_query_invalid_callback() {
        let req = Request::builder()
            .uri("/items?callback=alert(document.cookie)")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(ApiConfig::default()), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["errors"][0]["code"], "HTTP400");
        assert_eq!(json["errors"][0]["detail"], "invalid callback");
    }

    #[tokio::test]
    async fn test_query_without_layer() {
        let router = Router::new().route("/items", get(echo_query));
        let req = Request::builder()
            .uri("/items?page[number]=2")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(router, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "0|2|1|1||");
    }

    #[tokio::test]
    async fn test_json_body() {
        let req = Request::builder()
            .method("POST")
            .uri("/greet")
            .body(Body::from(r#"{"name":"ada"}"#))
            .unwrap();
        let (status, body) = send(app(ApiConfig::default()), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "hello ada");
    }

    #[tokio::test]
    async fn test_json_body_invalid() {
        let req = Request::builder()
            .method("POST")
            .uri("/greet")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(app(ApiConfig::default()), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["errors"][0]["title"], "Bad Request");
    }

    #[tokio::test]
    async fn test_json_body_too_large() {
        let req = Request::builder()
            .method("POST")
            .uri("/greet")
            .body(Body::from(r#"{"name":"a very long name indeed"}"#))
            .unwrap();
        let (status, body) = send(app(ApiConfig::new().body_limit(8)), req).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["errors"][0]["code"], "HTTP413");
    }
}

//! Response types for JSON and JSON-P envelopes.
use axum::{
    body::Body,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use jsonapi_axum_core::Envelope;
use serde::Serialize;

const APPLICATION_JSON: &str = "application/json";
const TEXT_JAVASCRIPT: &str = "text/javascript";

/// Body used when an envelope cannot be serialized.
const INTERNAL_ERROR_BODY: &str = r#"{"links":{},"meta":{"process_time":0,"total_data":0},"errors":[{"code":"HTTP500","title":"Internal Server Error","detail":"Internal Server Error"}]}"#;

/// An envelope paired with the HTTP status to send it with.
///
/// Handlers return this instead of a bare [`Envelope`]; use
/// [`ApiResponse::ok`] or `Envelope::into()` for `200 OK`.
///
/// # Example
///
/// ```ignore
/// async fn create(JsonBody(article): JsonBody<NewArticle>) -> ApiResponse<Article> {
///     let article = store.insert(article);
///     ApiResponse::new(StatusCode::CREATED, Envelope::new().with_data(article))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiResponse<T = ()> {
    pub status: StatusCode,
    pub envelope: Envelope<T>,
}

impl<T> ApiResponse<T> {
    pub fn new(status: StatusCode, envelope: Envelope<T>) -> Self {
        Self { status, envelope }
    }

    /// `200 OK` response.
    pub fn ok(envelope: Envelope<T>) -> Self {
        Self::new(StatusCode::OK, envelope)
    }

    pub fn into_inner(self) -> Envelope<T> {
        self.envelope
    }
}

impl<T> From<Envelope<T>> for ApiResponse<T> {
    fn from(envelope: Envelope<T>) -> Self {
        Self::ok(envelope)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        json_response(self.status, &self.envelope, &self.envelope.callback)
    }
}

/// Write `value` as JSON, or as a JSON-P call when `callback` is non-empty.
///
/// - JSON: `Content-Type: application/json` and `Access-Control-Allow-Origin: *`.
/// - JSON-P: `Content-Type: text/javascript`, body `callback(<json>)`.
pub(crate) fn json_response<T: Serialize + ?Sized>(
    status: StatusCode,
    value: &T,
    callback: &str,
) -> Response {
    let json = match serde_json::to_vec(value) {
        Ok(json) => json,
        Err(err) => {
            tracing::error!(error = %err, "failed to serialize response envelope");
            return internal_error_response();
        }
    };

    if callback.is_empty() {
        return Response::builder()
            .status(status)
            .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"))
            .header(header::CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON))
            .body(Body::from(json))
            .unwrap_or_else(|_| internal_error_response());
    }

    let mut body = Vec::with_capacity(callback.len() + json.len() + 2);
    body.extend_from_slice(callback.as_bytes());
    body.push(b'(');
    body.extend_from_slice(&json);
    body.push(b')');

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_JAVASCRIPT))
        .body(Body::from(body))
        .unwrap_or_else(|_| internal_error_response())
}

/// The generic 500 envelope, built without any fallible step.
pub(crate) fn internal_error_response() -> Response {
    let mut response = (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(APPLICATION_JSON),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}

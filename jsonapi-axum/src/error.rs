//! Standard error responses.
//!
//! An [`ApiError`] renders as the response envelope holding a single error
//! object:
//!
//! ```json
//! {"links": {}, "meta": {"process_time": 0.0, "total_data": 0},
//!  "errors": [{"code": "HTTP404", "title": "Not Found", "detail": "Not Found"}]}
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use jsonapi_axum_core::{Envelope, ErrorObject, ParseIdsError, RequestError};

use crate::response::json_response;

/// An error that renders as a standard error envelope with the given status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    detail: Option<String>,
}

impl ApiError {
    /// Error whose detail is the status reason phrase.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            detail: None,
        }
    }

    /// Error with a custom detail.
    pub fn with_detail<S: Into<String>>(status: StatusCode, detail: S) -> Self {
        Self {
            status,
            detail: Some(detail.into()),
        }
    }

    pub fn bad_request<S: Into<String>>(detail: S) -> Self {
        Self::with_detail(StatusCode::BAD_REQUEST, detail)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND)
    }

    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// The error object this error renders as.
    pub fn to_error_object(&self) -> ErrorObject {
        match &self.detail {
            Some(detail) => ErrorObject::from_status_with_detail(self.status, detail.as_str()),
            None => ErrorObject::from_status(self.status),
        }
    }

    /// The envelope this error renders as.
    pub fn to_envelope(&self) -> Envelope {
        let mut envelope = Envelope::new();
        envelope.errors.push(self.to_error_object());
        envelope
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.status)?;
        if let Some(detail) = &self.detail {
            write!(f, ": {}", detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!(status = %self.status, detail = ?self.detail, "error response");
        json_response(self.status, &self.to_envelope(), "")
    }
}

// ---- Conversions ----

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<ParseIdsError> for ApiError {
    fn from(err: ParseIdsError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<StatusCode> for ApiError {
    fn from(status: StatusCode) -> Self {
        Self::new(status)
    }
}

impl From<(StatusCode, String)> for ApiError {
    fn from((status, detail): (StatusCode, String)) -> Self {
        Self::with_detail(status, detail)
    }
}

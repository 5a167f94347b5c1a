//! Error types for request parsing.
//!
//! - [`RequestError`]: The query string could not be turned into a [`ListRequest`](crate::ListRequest)
//! - [`ParseIdsError`]: A comma separated id list contained a non-integer segment

/// Errors produced while parsing a list request.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// The `callback` parameter is not a valid JavaScript variable path.
    #[error("invalid callback")]
    InvalidCallback(String),
}

/// Error returned by [`parse_ids`](crate::parse_ids) when a segment is not an integer.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid id {segment:?}: {source}")]
pub struct ParseIdsError {
    segment: String,
    #[source]
    source: std::num::ParseIntError,
}

impl ParseIdsError {
    pub(crate) fn new(segment: &str, source: std::num::ParseIntError) -> Self {
        Self {
            segment: segment.to_string(),
            source,
        }
    }

    /// The offending segment.
    pub fn segment(&self) -> &str {
        &self.segment
    }
}

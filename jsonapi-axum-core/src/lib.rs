//! Core types for JSON-API style HTTP services.
//!
//! This crate has no web framework dependency. It is shared by the axum
//! integration (`jsonapi-axum`) and by anything else that needs to parse
//! list queries or build the response envelope.
//!
//! ## Modules
//!
//! - [`envelope`]: Response envelope, links, meta and error objects
//! - [`request`]: Query string parsing into [`ListRequest`]
//! - [`links`]: Pagination links via [`Links::paginate`]
//! - [`ids`]: Comma separated id lists
//! - [`error`]: Error types

mod envelope;
mod error;
mod ids;
mod links;
mod request;

pub use envelope::*;
pub use error::*;
pub use ids::*;
pub use request::*;

//! # HTTP Model
//!
//! Request and response values as the dispatch pipeline sees them. The raw
//! wire is the embedding host's concern: requests arrive here already parsed,
//! and responses leave as serialized bytes handed to the connection stream.
//!
//! - [`Request`] - an owned, per-request value moved through the middleware
//!   chain; carries routing params, the interception state, and an in-flight
//!   [`Response`] partial that stages may populate.
//! - [`Response`] - status, ordered multi-value headers, and a tagged
//!   [`Body`] variant; supports right-biased merging of partial responses.
//! - [`Headers`] - case-insensitive, order-preserving, multi-value header map
//!   with stack-allocated storage for the common case.

pub mod headers;
pub mod request;
pub mod response;

pub use headers::{Headers, MAX_INLINE_HEADERS};
pub use request::Request;
pub use response::{Body, BodySender, CustomResponder, Response};

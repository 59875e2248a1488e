//! # Server Assembly
//!
//! Everything the embedding host touches before it starts accepting
//! connections: the [`App`] builder collects middleware, routes and the
//! error handler; [`App::bind`] freezes them into an immutable [`Service`];
//! [`ServerConfig`] carries the socket options the host applies when
//! listening; and [`HttpStream`] is the seam through which responses leave.
//!
//! The accept loop and the wire parser live with the host. Manifold's side
//! of the contract starts at a parsed [`Request`](crate::http::Request) and
//! an open stream, and ends at `send`/`close` calls on that stream.

pub mod app;
pub mod config;
pub mod stream;

pub use app::{App, Service};
pub use config::ServerConfig;
pub use stream::HttpStream;

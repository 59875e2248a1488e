//! # Manifold
//!
//! **Manifold** is the request-dispatch core of an embedded HTTP server
//! runtime, built on the [`may`] coroutine runtime. Given a parsed request
//! and an open connection stream it runs a middleware chain, resolves a
//! route handler, composes and finalizes a response, serializes it, and
//! decides whether the connection stays open.
//!
//! ## Architecture
//!
//! - **[`http`](crate::http)** - request/response model: ordered
//!   case-insensitive headers, tagged body variants, right-biased response
//!   merging
//! - **[`router`]** - path-template matching (`/users/:id`) with
//!   deterministic precedence and stack-allocated param binding
//! - **[`middleware`]** - continuation-passing chain; each link continues or
//!   short-circuits
//! - **[`responder`]** - terminal step: interception, route match, handler
//!   invocation, response merge
//! - **[`dispatcher`]** - per-request orchestration: delivery paths,
//!   finalization, connection close policy, the single error-handler funnel
//! - **[`server`]** - the assembly surface ([`App`]/[`Service`]), listen
//!   configuration, and the [`HttpStream`] seam the host's accept loop
//!   drives
//!
//! What Manifold deliberately does **not** do: parse bytes off the wire,
//! own the accept/event loop, or manage worker processes. The host parses,
//! accepts and clusters; Manifold dispatches.
//!
//! ## Quick start
//!
//! ```no_run
//! use http::StatusCode;
//! use manifold::{App, Response};
//! use serde_json::json;
//!
//! let service = App::new()
//!     .get("/health", |_req| {
//!         Ok(Response::json(StatusCode::OK, json!({ "status": "ok" })))
//!     })
//!     .bind();
//!
//! // The host's accept loop parses each request and calls:
//! //   service.dispatch(request, &mut stream);
//! ```
//!
//! ## Runtime considerations
//!
//! Handlers run in `may` coroutines, one per route, spawned at bind time and
//! fed over channels. Stack size is configurable via `MANIFOLD_STACK_SIZE`.
//! Blocking a handler suspends only its coroutine; the route table and error
//! handler are the only cross-request state and are read-only after bind.

pub mod dispatcher;
pub mod http;
pub mod ids;
pub mod middleware;
pub mod responder;
pub mod router;
pub mod runtime_config;
pub mod server;

mod error;

pub use crate::dispatcher::{default_error_handler, Dispatcher, ErrorHandler, SERVER_NAME};
pub use crate::error::{DispatchResult, Error};
pub use crate::http::{Body, Headers, Request, Response};
pub use crate::server::{App, HttpStream, ServerConfig, Service};

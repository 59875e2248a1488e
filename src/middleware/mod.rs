//! # Middleware
//!
//! Continuation-passing request pipeline. Each link implements
//! [`Middleware::respond`] and either calls `next.run(request)` to continue,
//! optionally after mutating the request or pre-populating its in-flight
//! response, or returns early with a response or an error, terminating the
//! chain before the router is ever consulted.
//!
//! Links execute strictly in registration order, one continuation after its
//! predecessor; no concurrency is introduced within one chain invocation.
//! When no middleware is registered, [`Passthrough`] is installed at bind
//! time so the chain always has at least one link.

mod core;
mod logger;
mod metrics;

pub use core::{Chain, Middleware, Next, Passthrough, Responder};
pub use logger::LoggerMiddleware;
pub use metrics::MetricsMiddleware;

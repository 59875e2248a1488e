//! # Router
//!
//! Path matching and route resolution. Patterns are plain path templates
//! (`/users/:id`, `/files/:name?`) compiled to regexes when the route table
//! is built, before the host starts accepting connections. The table is
//! read-only during dispatch and shared behind an `Arc`, so matching needs
//! no locking.
//!
//! Matching is deterministic: among the routes whose method and pattern fit
//! a request, the one with the most literal (non-parameter) segments wins,
//! and ties fall back to registration order. `/users/me` therefore beats
//! `/users/:id` no matter which was registered first.

mod core;

pub use core::{ParamVec, Route, RouteMatch, Router, MAX_INLINE_PARAMS};

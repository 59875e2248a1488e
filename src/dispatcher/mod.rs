//! # Dispatcher
//!
//! Per-request orchestration. `dispatch` drives one request through the
//! middleware chain into the terminal responder, then delivers the outcome:
//! custom responders take over production, streaming senders get the raw
//! stream, everything else is finalized (`Date`, `Server`, `Connection`,
//! `Content-Length`), serialized and sent. After delivery the keep-alive
//! policy decides whether the connection stream is closed; close failures
//! are swallowed by contract so a bad peer can never crash the loop.
//!
//! Route handlers run in `may` coroutines spawned at bind time, one per
//! route, fed through MPSC channels with per-request reply channels. A
//! handler that panics is caught and surfaces as a generic handler failure;
//! the coroutine keeps serving subsequent requests.

mod core;

pub use core::{
    default_error_handler, Dispatcher, ErrorHandler, HandlerJob, HandlerSender, SERVER_NAME,
};
pub(crate) use core::spawn_handler;

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use http::StatusCode;
use may::coroutine;
use may::sync::mpsc;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::error::{DispatchResult, Error};
use crate::http::{Body, Request, Response};
use crate::ids::RequestId;
use crate::middleware::{Chain, Middleware, Passthrough};
use crate::responder::AsyncResponder;
use crate::router::Router;
use crate::server::HttpStream;

/// Value of the `Server` header stamped on every finalized response.
pub const SERVER_NAME: &str = "Manifold";

/// Maps a dispatch failure to a presentable response.
///
/// Supplied by the hosting application; invoked exactly once per failing
/// request. Its result flows through the same finalize/send/close path as a
/// successful response; there is no separate error wire format.
pub type ErrorHandler = Arc<dyn Fn(&Error) -> Response + Send + Sync>;

/// Default failure mapping: route-not-found → 404, anything else → 500,
/// both with a small JSON body.
pub fn default_error_handler() -> ErrorHandler {
    Arc::new(|error| match error {
        Error::RouteNotFound { path } => Response::json(
            StatusCode::NOT_FOUND,
            json!({ "error": "Not Found", "path": path }),
        ),
        other => Response::json(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": other.to_string() }),
        ),
    })
}

/// One unit of work sent to a handler coroutine.
pub struct HandlerJob {
    pub request: Request,
    /// Per-request reply channel back to the invoking responder.
    pub reply_tx: mpsc::Sender<DispatchResult>,
}

/// Channel sender feeding a route's handler coroutine.
pub type HandlerSender = mpsc::Sender<HandlerJob>;

/// Spawn the coroutine that serves one route's handler.
///
/// The coroutine drains its channel for the lifetime of the process. Panics
/// inside the handler are caught and reported as [`Error::Handler`] so one
/// bad request cannot tear the route down; the loop continues with the next
/// job.
pub(crate) fn spawn_handler<F>(pattern: &str, handler: F, stack_size: usize) -> HandlerSender
where
    F: Fn(Request) -> DispatchResult + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<HandlerJob>();
    let route_label = pattern.to_string();

    // SAFETY: `coroutine::Builder::spawn` is unsafe because of the may
    // runtime's requirements, not this function's logic. The closure is
    // Send + 'static with no borrowed state, spawning happens once at bind
    // time, and replies travel over owned channels.
    let spawned = unsafe {
        coroutine::Builder::new()
            .stack_size(stack_size)
            .spawn(move || {
                debug!(route = %route_label, stack_size, "handler coroutine started");
                for job in rx.iter() {
                    let HandlerJob { request, reply_tx } = job;
                    let started = Instant::now();
                    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                        handler(request)
                    }));
                    let reply = match outcome {
                        Ok(result) => result,
                        Err(panic) => {
                            error!(
                                route = %route_label,
                                panic = ?panic,
                                "handler panicked"
                            );
                            Err(Error::Handler(format!("handler panicked: {panic:?}")))
                        }
                    };
                    debug!(
                        route = %route_label,
                        latency_ms = started.elapsed().as_millis() as u64,
                        "handler finished"
                    );
                    // The invoker may be gone (stream torn down); nothing to
                    // do with the reply then.
                    let _ = reply_tx.send(reply);
                }
            })
    };

    if let Err(e) = spawned {
        // Sends to this route will fail and surface as handler errors.
        error!(error = %e, stack_size, "failed to spawn handler coroutine");
    }

    tx
}

/// Drives a single request through the chain and delivers the outcome.
///
/// Holds the only state shared across in-flight requests (the route table
/// and the error handler), both read-only after bind, so dispatch needs no
/// locking.
pub struct Dispatcher {
    router: Arc<Router>,
    middlewares: Vec<Arc<dyn Middleware>>,
    error_handler: ErrorHandler,
}

impl Dispatcher {
    pub fn new(
        router: Arc<Router>,
        mut middlewares: Vec<Arc<dyn Middleware>>,
        error_handler: ErrorHandler,
    ) -> Self {
        if middlewares.is_empty() {
            middlewares.push(Arc::new(Passthrough));
        }
        Dispatcher {
            router,
            middlewares,
            error_handler,
        }
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    /// Dispatch one request and deliver its response on `stream`.
    ///
    /// Never returns an error: every failure above the stream layer funnels
    /// through the error handler into a regular response, and stream-level
    /// send/close failures are best-effort by contract.
    pub fn dispatch(&self, request: Request, stream: &mut dyn HttpStream) {
        let request_id = RequestId::from_header_or_new(request.header("x-request-id"));
        let keep_alive = request.is_keep_alive;
        let started = Instant::now();
        info!(
            request_id = %request_id,
            method = %request.method,
            path = %request.path,
            keep_alive,
            "dispatching request"
        );

        let responder = AsyncResponder::new(Arc::clone(&self.router));
        let result = Chain::new(&self.middlewares, &responder).respond(request);

        match result {
            Ok(response) => self.deliver(response, keep_alive, stream, request_id, started),
            Err(error) => {
                warn!(request_id = %request_id, error = %error, "request failed");
                let response = (self.error_handler)(&error);
                self.send_response(response, keep_alive, stream, request_id, started);
            }
        }
    }

    /// Deliver a successful chain outcome, picking the path its shape asks
    /// for: custom responder, streaming sender, or plain finalize-and-send.
    fn deliver(
        &self,
        response: Response,
        keep_alive: bool,
        stream: &mut dyn HttpStream,
        request_id: RequestId,
        started: Instant,
    ) {
        if let Some(custom) = response.custom_responder.clone() {
            match custom.respond(response) {
                Ok(produced) => {
                    self.send_response(produced, keep_alive, stream, request_id, started)
                }
                Err(error) => {
                    // Failed custom production leaves nothing sendable; the
                    // contract is an immediate best-effort close.
                    warn!(request_id = %request_id, error = %error, "custom responder failed");
                    let _ = stream.close();
                }
            }
            return;
        }

        match response.body {
            Body::Sender(ref sender) => match sender.send(stream) {
                Ok(()) => {
                    info!(request_id = %request_id, "streamed response body sent");
                    close_if_needed(stream, keep_alive);
                }
                Err(error) => {
                    warn!(request_id = %request_id, error = %error, "body sender failed");
                    let _ = stream.close();
                }
            },
            Body::Buffer(_) | Body::Chunked(_) => {
                self.send_response(response, keep_alive, stream, request_id, started)
            }
        }
    }

    /// Finalize, serialize and send, then apply the close policy.
    fn send_response(
        &self,
        mut response: Response,
        keep_alive: bool,
        stream: &mut dyn HttpStream,
        request_id: RequestId,
        started: Instant,
    ) {
        finalize(&mut response, keep_alive);
        let wire = response.serialize();
        if let Err(error) = stream.send(&wire) {
            warn!(request_id = %request_id, error = %error, "failed to send response");
        } else {
            info!(
                request_id = %request_id,
                status = response.status.as_u16(),
                bytes = wire.len(),
                latency_ms = started.elapsed().as_millis() as u64,
                "response sent"
            );
        }
        close_if_needed(stream, keep_alive);
    }
}

/// Stamp the headers the core owns before serialization.
///
/// `Date` and `Server` are always overwritten; `Connection` only when no
/// upstream stage set it; `Content-Length` only when still zero and the body
/// is not chunk-encoded.
fn finalize(response: &mut Response, keep_alive: bool) {
    response
        .headers
        .set("Date", Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string());
    response.headers.set("Server", SERVER_NAME);
    if !response.headers.contains("connection") {
        response
            .headers
            .set("Connection", if keep_alive { "Keep-Alive" } else { "Close" });
    }
    if response.content_length == 0 && !response.is_chunk_encoded {
        response.content_length = response.body.byte_len();
    }
}

/// Keep-alive decides the connection's fate; a failing close is ignored by
/// contract.
fn close_if_needed(stream: &mut dyn HttpStream, keep_alive: bool) {
    if keep_alive {
        return;
    }
    if let Err(error) = stream.close() {
        debug!(error = %error, "stream close failed, ignoring");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalize_stamps_date_server_and_connection() {
        let mut response = Response::text(StatusCode::OK, "hi");
        finalize(&mut response, true);

        let date = response.header("date").unwrap();
        assert!(date.ends_with(" GMT"));
        assert_eq!(response.header("server"), Some(SERVER_NAME));
        assert_eq!(response.header("connection"), Some("Keep-Alive"));
        assert_eq!(response.content_length, 2);
    }

    #[test]
    fn finalize_respects_upstream_connection_header() {
        let mut response = Response::text(StatusCode::OK, "hi");
        response.set_header("Connection", "Upgrade");
        finalize(&mut response, false);
        assert_eq!(response.header("connection"), Some("Upgrade"));
    }

    #[test]
    fn finalize_leaves_chunked_content_length_alone() {
        let mut response = Response::chunked(StatusCode::OK, vec![b"abc".to_vec()]);
        finalize(&mut response, true);
        assert_eq!(response.content_length, 0);
    }

    #[test]
    fn finalize_marks_close_when_not_keep_alive() {
        let mut response = Response::new(StatusCode::OK);
        finalize(&mut response, false);
        assert_eq!(response.header("connection"), Some("Close"));
    }
}

use crate::http::Response;

/// Failure raised while dispatching a single request.
///
/// Every variant is funneled exactly once through the configured
/// [`ErrorHandler`](crate::dispatcher::ErrorHandler), which turns it into a
/// presentable [`Response`] that follows the same finalize/send/close path as
/// a successful one. Stream-level I/O failures are not represented here; they
/// are best-effort by policy and never escalate past the dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No registered route matched the request path.
    #[error("no route matched {path}")]
    RouteNotFound { path: String },

    /// A route handler panicked, or its coroutine is gone.
    #[error("handler failed: {0}")]
    Handler(String),

    /// Any other failure raised inside a middleware or handler body.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Outcome of a middleware link, route handler, or the terminal responder.
pub type DispatchResult = Result<Response, Error>;

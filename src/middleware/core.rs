use std::sync::Arc;

use crate::error::DispatchResult;
use crate::http::Request;

/// Terminal step of the dispatch chain.
///
/// Invoked when every middleware link has passed the request along. The
/// pipeline's terminal responder resolves routing; tests substitute their
/// own.
pub trait Responder: Send + Sync {
    fn respond(&self, request: Request) -> DispatchResult;
}

/// One link of the request pipeline.
///
/// `respond` receives the request by value together with the continuation to
/// the rest of the chain. A link may:
///
/// - call `next.run(request)` to continue, optionally having mutated the
///   request or contributed to its in-flight response;
/// - return `Ok(response)` without calling `next`, terminating the chain
///   early (auth rejection, rate limiting, a cached reply);
/// - return `Err(..)` (or propagate one with `?`), delivering the failure to
///   the dispatcher's error handler. No later link runs.
pub trait Middleware: Send + Sync {
    fn respond(&self, request: Request, next: Next<'_>) -> DispatchResult;
}

/// Plain functions and closures with the right shape are middleware.
impl<F> Middleware for F
where
    F: for<'a> Fn(Request, Next<'a>) -> DispatchResult + Send + Sync,
{
    fn respond(&self, request: Request, next: Next<'_>) -> DispatchResult {
        self(request, next)
    }
}

/// Continuation to the unexecuted remainder of the chain.
///
/// Consumed by `run`, so a link can continue at most once; dropping it
/// without calling `run` is the short-circuit.
pub struct Next<'a> {
    rest: &'a [Arc<dyn Middleware>],
    terminal: &'a dyn Responder,
}

impl<'a> Next<'a> {
    pub fn run(self, request: Request) -> DispatchResult {
        match self.rest.split_first() {
            Some((link, rest)) => link.respond(
                request,
                Next {
                    rest,
                    terminal: self.terminal,
                },
            ),
            None => self.terminal.respond(request),
        }
    }
}

/// The registered links plus the terminal responder, linked into nested
/// continuations per request.
pub struct Chain<'a> {
    links: &'a [Arc<dyn Middleware>],
    terminal: &'a dyn Responder,
}

impl<'a> Chain<'a> {
    pub fn new(links: &'a [Arc<dyn Middleware>], terminal: &'a dyn Responder) -> Self {
        Chain { links, terminal }
    }

    pub fn respond(&self, request: Request) -> DispatchResult {
        Next {
            rest: self.links,
            terminal: self.terminal,
        }
        .run(request)
    }
}

/// No-op link installed when the application registers no middleware, so the
/// chain is never empty.
pub struct Passthrough;

impl Middleware for Passthrough {
    fn respond(&self, request: Request, next: Next<'_>) -> DispatchResult {
        next.run(request)
    }
}

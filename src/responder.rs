//! Terminal responder: the step the middleware chain bottoms out in.
//!
//! Resolves a request to a route handler, or to a routing failure the
//! dispatcher turns into an error response. Interception short-circuits the
//! whole step: a request whose outcome a middleware already decided is never
//! routed, even when a route would match.

use std::sync::Arc;

use tracing::debug;

use crate::error::{DispatchResult, Error};
use crate::http::Request;
use crate::middleware::Responder;
use crate::router::Router;

/// Wraps the router into the chain's terminal step.
pub struct AsyncResponder {
    router: Arc<Router>,
}

impl AsyncResponder {
    pub fn new(router: Arc<Router>) -> Self {
        AsyncResponder { router }
    }
}

impl Responder for AsyncResponder {
    fn respond(&self, request: Request) -> DispatchResult {
        if request.is_intercepted {
            debug!(path = %request.path, "request intercepted, skipping routing");
            return Ok(request.response);
        }

        let Some(found) = self.router.matched(&request) else {
            let path = if request.path.is_empty() {
                "/".to_string()
            } else {
                request.path.clone()
            };
            return Err(Error::RouteNotFound { path });
        };

        // Bind params into this request's own copy; the shared table is
        // never touched.
        let mut request = request;
        request.params = found.params;

        // The in-flight response may already carry partial output from
        // middleware; the handler's response completes it, later fields
        // winning.
        let inflight = request.response.clone();
        let handled = found.route.invoke(request)?;
        Ok(inflight.merged(handled))
    }
}

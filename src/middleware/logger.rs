use std::time::Instant;

use tracing::{info, warn};

use super::{Middleware, Next};
use crate::error::DispatchResult;
use crate::http::Request;

/// Logs one structured event per request with method, path, outcome and
/// latency. Purely observational; never blocks or rewrites a request.
pub struct LoggerMiddleware;

impl Middleware for LoggerMiddleware {
    fn respond(&self, request: Request, next: Next<'_>) -> DispatchResult {
        let method = request.method.clone();
        let path = request.path.clone();
        let started = Instant::now();

        let result = next.run(request);

        let latency_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(response) => info!(
                method = %method,
                path = %path,
                status = response.status.as_u16(),
                latency_ms,
                "request completed"
            ),
            Err(error) => warn!(
                method = %method,
                path = %path,
                error = %error,
                latency_ms,
                "request failed"
            ),
        }
        result
    }
}

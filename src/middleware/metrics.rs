use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use super::{Middleware, Next};
use crate::error::DispatchResult;
use crate::http::Request;

/// Counts requests and accumulates latency.
///
/// All counters are atomics with relaxed ordering: eventually consistent and
/// nearly free to update, which is all a throughput counter needs. Share one
/// instance between the chain and whatever reports the numbers.
#[derive(Default)]
pub struct MetricsMiddleware {
    request_count: AtomicUsize,
    total_latency_ns: AtomicU64,
}

impl MetricsMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of requests that entered the chain through this link.
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Mean latency across all observed requests; zero before the first one.
    pub fn average_latency(&self) -> Duration {
        let count = self.request_count.load(Ordering::Relaxed) as u64;
        if count == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.total_latency_ns.load(Ordering::Relaxed) / count)
        }
    }
}

impl Middleware for MetricsMiddleware {
    fn respond(&self, request: Request, next: Next<'_>) -> DispatchResult {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        let started = Instant::now();
        let result = next.run(request);
        self.total_latency_ns
            .fetch_add(started.elapsed().as_nanos() as u64, Ordering::Relaxed);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Headers, Request, Response};
    use crate::middleware::{Chain, Responder};
    use http::{Method, StatusCode, Version};
    use std::sync::Arc;

    struct Terminal;

    impl Responder for Terminal {
        fn respond(&self, _request: Request) -> DispatchResult {
            Ok(Response::new(StatusCode::OK))
        }
    }

    #[test]
    fn counts_requests_and_latency() {
        let metrics = Arc::new(MetricsMiddleware::new());
        let links: Vec<Arc<dyn crate::middleware::Middleware>> = vec![metrics.clone()];
        let terminal = Terminal;
        let chain = Chain::new(&links, &terminal);

        for _ in 0..3 {
            let request = Request::new(
                Method::GET,
                "/",
                Version::HTTP_11,
                Headers::new(),
                Vec::new(),
            );
            chain.respond(request).unwrap();
        }

        assert_eq!(metrics.request_count(), 3);
    }

    #[test]
    fn zero_requests_means_zero_latency() {
        let metrics = MetricsMiddleware::new();
        assert_eq!(metrics.request_count(), 0);
        assert_eq!(metrics.average_latency(), Duration::from_nanos(0));
    }
}

use http::Method;
use may::sync::mpsc;
use regex::Regex;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, info};

use crate::dispatcher::{HandlerJob, HandlerSender};
use crate::error::{DispatchResult, Error};
use crate::http::Request;

/// Maximum number of path parameters before heap allocation.
/// Deeply parameterized paths beyond this are rare.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the dispatch hot path.
///
/// Parameter names are `Arc<str>`: they come from the route table built at
/// startup, so binding a request clones an atomic refcount instead of the
/// name bytes. Values are per-request data extracted from the path and stay
/// owned `String`s.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// A registered `(method, pattern, handler)` entry.
///
/// The handler runs in its own coroutine; the route holds the channel sender
/// that feeds it. Immutable once the table is built.
pub struct Route {
    pub method: Method,
    pub pattern: String,
    regex: Regex,
    param_names: Vec<Arc<str>>,
    literal_segments: usize,
    sender: HandlerSender,
}

impl Route {
    pub(crate) fn new(method: Method, pattern: &str, sender: HandlerSender) -> Self {
        let (regex, param_names, literal_segments) = compile_pattern(pattern);
        Route {
            method,
            pattern: pattern.to_string(),
            regex,
            param_names,
            literal_segments,
            sender,
        }
    }

    fn matches(&self, method: &Method, path: &str) -> bool {
        self.method == *method && self.regex.is_match(path)
    }

    /// Extract named parameters from a concrete path.
    ///
    /// Unmatched optional segments are simply absent, never empty strings.
    fn params(&self, path: &str) -> ParamVec {
        let mut params = ParamVec::new();
        if let Some(caps) = self.regex.captures(path) {
            for (i, name) in self.param_names.iter().enumerate() {
                if let Some(m) = caps.get(i + 1) {
                    params.push((Arc::clone(name), m.as_str().to_string()));
                }
            }
        }
        params
    }

    /// Hand the request to the handler coroutine and wait for its reply.
    ///
    /// A vanished coroutine (spawn failure, panic that tore the loop down, or
    /// a dropped reply channel) surfaces as [`Error::Handler`] rather than
    /// hanging the request.
    pub(crate) fn invoke(&self, request: Request) -> DispatchResult {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.sender
            .send(HandlerJob { request, reply_tx })
            .map_err(|_| Error::Handler(format!("handler for {} is gone", self.pattern)))?;
        match reply_rx.recv() {
            Ok(result) => result,
            Err(_) => Err(Error::Handler(format!(
                "handler for {} dropped the request without replying",
                self.pattern
            ))),
        }
    }
}

/// Result of successfully matching a request to a route.
#[derive(Clone)]
pub struct RouteMatch {
    pub route: Arc<Route>,
    /// Parameters extracted from the path (e.g. `:id` → `("id", "42")`).
    pub params: ParamVec,
}

/// Matches requests against the registered route table.
///
/// Built once by [`App::bind`](crate::server::App::bind); read-only during
/// dispatch. Matching is a linear scan over the compiled patterns with a
/// specificity score, which keeps the precedence rule obvious and the table
/// trivially shareable.
pub struct Router {
    routes: Vec<Arc<Route>>,
}

impl Router {
    pub fn new(routes: Vec<Route>) -> Self {
        let routes: Vec<Arc<Route>> = routes.into_iter().map(Arc::new).collect();
        let summary: Vec<String> = routes
            .iter()
            .take(10)
            .map(|r| format!("{} {}", r.method, r.pattern))
            .collect();
        info!(
            routes_count = routes.len(),
            routes_summary = ?summary,
            "route table built"
        );
        Router { routes }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Match a request to the best registered route.
    ///
    /// Precedence: most literal segments wins; ties break by registration
    /// order. Deterministic for a fixed table: repeated calls with the same
    /// request return the same route and the same extracted params.
    pub fn matched(&self, request: &Request) -> Option<RouteMatch> {
        debug!(method = %request.method, path = %request.path, "route match attempt");
        let mut best: Option<(usize, &Arc<Route>)> = None;
        for route in &self.routes {
            if !route.matches(&request.method, &request.path) {
                continue;
            }
            let better = match best {
                Some((literals, _)) => route.literal_segments > literals,
                None => true,
            };
            if better {
                best = Some((route.literal_segments, route));
            }
        }
        match best {
            Some((_, route)) => {
                let params = route.params(&request.path);
                debug!(
                    method = %request.method,
                    path = %request.path,
                    pattern = %route.pattern,
                    params = ?params,
                    "route matched"
                );
                Some(RouteMatch {
                    route: Arc::clone(route),
                    params,
                })
            }
            None => {
                debug!(method = %request.method, path = %request.path, "no route matched");
                None
            }
        }
    }
}

/// Compile a path template into a matcher.
///
/// `:name` binds one segment, `:name?` optionally binds one segment, and
/// everything else matches literally. Returns the regex, the ordered
/// parameter names, and the literal-segment count used for precedence.
fn compile_pattern(pattern: &str) -> (Regex, Vec<Arc<str>>, usize) {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push('^');
    let mut param_names = Vec::new();
    let mut literal_segments = 0;

    let mut segments = pattern.split('/').filter(|s| !s.is_empty()).peekable();
    if segments.peek().is_none() {
        source.push('/');
    }
    for segment in segments {
        if let Some(name) = segment.strip_prefix(':') {
            if let Some(name) = name.strip_suffix('?') {
                source.push_str("(?:/([^/]+))?");
                param_names.push(Arc::from(name));
            } else {
                source.push_str("/([^/]+)");
                param_names.push(Arc::from(name));
            }
        } else {
            source.push('/');
            source.push_str(&regex::escape(segment));
            literal_segments += 1;
        }
    }
    source.push('$');

    let regex = Regex::new(&source).expect("failed to compile route pattern");
    (regex, param_names, literal_segments)
}

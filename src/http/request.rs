use http::{Method, Version};

use super::headers::Headers;
use super::response::Response;
use crate::router::ParamVec;

/// A parsed inbound request as the dispatch pipeline sees it.
///
/// Built once per inbound message by the embedding host's parser, then moved
/// by value through the middleware chain to the terminal responder. Stages
/// that want to influence the outcome mutate their copy: `params` is bound by
/// routing, `response` accumulates partial output contributed by middleware,
/// and [`intercept`](Request::intercept) marks the outcome as already decided
/// so routing is skipped entirely.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Request path, without the query string.
    pub path: String,
    /// Protocol version the request arrived on.
    pub version: Version,
    /// Request headers.
    pub headers: Headers,
    /// Raw request body.
    pub body: Vec<u8>,
    /// Path parameters bound by the router (empty until routing runs).
    pub params: ParamVec,
    /// Set when a prior stage has fully produced the final response;
    /// the responder then returns `response` without consulting the router.
    pub is_intercepted: bool,
    /// In-flight response, populated by middleware and merged with the
    /// route handler's response.
    pub response: Response,
    /// Whether the connection should stay open after this exchange.
    /// Derived from the protocol version and the `Connection` header.
    pub is_keep_alive: bool,
}

impl Request {
    pub fn new(
        method: Method,
        path: impl Into<String>,
        version: Version,
        headers: Headers,
        body: Vec<u8>,
    ) -> Self {
        let is_keep_alive = derive_keep_alive(version, &headers);
        Request {
            method,
            path: path.into(),
            version,
            headers,
            body,
            params: ParamVec::new(),
            is_intercepted: false,
            response: Response::default(),
            is_keep_alive,
        }
    }

    /// Path parameter by name.
    ///
    /// Last write wins: with duplicate names at different path depths the
    /// deepest binding is returned.
    #[inline]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Header value by name (case-insensitive).
    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Attach a fully decided response and mark the request intercepted.
    ///
    /// Once set, the request must not be routed further; the terminal
    /// responder returns `response` unchanged even when a route would match.
    pub fn intercept(&mut self, response: Response) {
        self.response = response;
        self.is_intercepted = true;
    }
}

/// HTTP/1.1 defaults to persistent connections; HTTP/1.0 and earlier default
/// to closing. An explicit `Connection` header overrides either way.
fn derive_keep_alive(version: Version, headers: &Headers) -> bool {
    match headers.get("connection") {
        Some(value) => {
            let value = value.to_ascii_lowercase();
            if value.contains("close") {
                false
            } else if value.contains("keep-alive") {
                true
            } else {
                version != Version::HTTP_10 && version != Version::HTTP_09
            }
        }
        None => version != Version::HTTP_10 && version != Version::HTTP_09,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with(version: Version, connection: Option<&str>) -> Request {
        let mut headers = Headers::new();
        if let Some(v) = connection {
            headers.set("Connection", v);
        }
        Request::new(Method::GET, "/", version, headers, Vec::new())
    }

    #[test]
    fn http11_defaults_to_keep_alive() {
        assert!(request_with(Version::HTTP_11, None).is_keep_alive);
    }

    #[test]
    fn http10_defaults_to_close() {
        assert!(!request_with(Version::HTTP_10, None).is_keep_alive);
    }

    #[test]
    fn explicit_connection_header_wins() {
        assert!(!request_with(Version::HTTP_11, Some("close")).is_keep_alive);
        assert!(request_with(Version::HTTP_10, Some("Keep-Alive")).is_keep_alive);
    }

    #[test]
    fn intercept_attaches_response_and_sets_flag() {
        let mut req = request_with(Version::HTTP_11, None);
        assert!(!req.is_intercepted);
        req.intercept(Response::default());
        assert!(req.is_intercepted);
    }

    #[test]
    fn param_lookup_is_last_write_wins() {
        let mut req = request_with(Version::HTTP_11, None);
        req.params.push(("id".into(), "org".to_string()));
        req.params.push(("id".into(), "user".to_string()));
        assert_eq!(req.param("id"), Some("user"));
    }
}

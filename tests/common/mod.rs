#![allow(dead_code)]

use std::io;

use http::{Method, Version};
use manifold::{Headers, HttpStream, Request};

/// Install a fmt subscriber once per test binary; repeat calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// In-memory connection stream recording what the dispatcher does to it.
///
/// `fail_send` / `fail_close` simulate a broken peer so tests can assert the
/// best-effort policies (send failures logged, close failures swallowed).
#[derive(Default)]
pub struct MockStream {
    pub sent: Vec<Vec<u8>>,
    pub closed: usize,
    pub fail_send: bool,
    pub fail_close: bool,
}

impl MockStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far, as one lossy UTF-8 string.
    pub fn wire(&self) -> String {
        let bytes: Vec<u8> = self.sent.iter().flatten().copied().collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl HttpStream for MockStream {
    fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        if self.fail_send {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer went away"));
        }
        self.sent.push(bytes.to_vec());
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.closed += 1;
        if self.fail_close {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "already closed"));
        }
        Ok(())
    }
}

/// A bare HTTP/1.1 request with no special headers (keep-alive by default).
pub fn request(method: Method, path: &str) -> Request {
    Request::new(method, path, Version::HTTP_11, Headers::new(), Vec::new())
}

/// Same, with extra headers.
pub fn request_with_headers(method: Method, path: &str, pairs: &[(&str, &str)]) -> Request {
    let mut headers = Headers::new();
    for (name, value) in pairs {
        headers.set(name, *value);
    }
    Request::new(method, path, Version::HTTP_11, headers, Vec::new())
}

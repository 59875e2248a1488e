use std::fmt;
use std::io;
use std::sync::Arc;

use http::StatusCode;

use super::headers::Headers;
use crate::error::DispatchResult;
use crate::server::HttpStream;

/// Streams a response body straight to the connection.
///
/// A sender owns the whole exchange: it writes the status line, headers and
/// body bytes itself, bypassing finalization and buffered serialization. Used
/// for bodies too large or too live to buffer (event streams, large payloads
/// produced incrementally).
pub trait BodySender: Send + Sync {
    fn send(&self, stream: &mut dyn HttpStream) -> io::Result<()>;
}

impl<F> BodySender for F
where
    F: Fn(&mut dyn HttpStream) -> io::Result<()> + Send + Sync,
{
    fn send(&self, stream: &mut dyn HttpStream) -> io::Result<()> {
        self(stream)
    }
}

/// Takes over final response production.
///
/// When a response carries a custom responder, the dispatcher hands it the
/// response instead of serializing it; whatever the responder returns is
/// finalized and sent in its place.
pub trait CustomResponder: Send + Sync {
    fn respond(&self, response: Response) -> DispatchResult;
}

impl<F> CustomResponder for F
where
    F: Fn(Response) -> DispatchResult + Send + Sync,
{
    fn respond(&self, response: Response) -> DispatchResult {
        self(response)
    }
}

/// Response body variant. The dispatcher matches exhaustively on this, so a
/// new variant cannot be added without deciding how it is delivered.
#[derive(Clone)]
pub enum Body {
    /// Fixed byte sequence, buffered and sent with a `Content-Length`.
    Buffer(Vec<u8>),
    /// Pre-split chunks, sent with `Transfer-Encoding: chunked` framing.
    Chunked(Vec<Vec<u8>>),
    /// Streaming sender invoked with the connection stream directly.
    Sender(Arc<dyn BodySender>),
}

impl Default for Body {
    fn default() -> Self {
        Body::Buffer(Vec::new())
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Buffer(bytes) => f.debug_tuple("Buffer").field(&bytes.len()).finish(),
            Body::Chunked(chunks) => f.debug_tuple("Chunked").field(&chunks.len()).finish(),
            Body::Sender(_) => f.write_str("Sender"),
        }
    }
}

impl Body {
    /// A sender is never considered empty: it produces bytes on demand.
    pub fn is_empty(&self) -> bool {
        match self {
            Body::Buffer(bytes) => bytes.is_empty(),
            Body::Chunked(chunks) => chunks.is_empty(),
            Body::Sender(_) => false,
        }
    }

    /// Byte length of buffered content; zero for senders.
    pub fn byte_len(&self) -> usize {
        match self {
            Body::Buffer(bytes) => bytes.len(),
            Body::Chunked(chunks) => chunks.iter().map(Vec::len).sum(),
            Body::Sender(_) => 0,
        }
    }
}

/// An outgoing HTTP response.
///
/// Mutable while it travels forward through the pipeline; ownership moves
/// with it, so no stage ever shares it mutably with another. Middleware may
/// contribute a partial response (headers, status) that the route handler's
/// response completes via [`merged`](Response::merged).
#[derive(Clone, Default)]
pub struct Response {
    pub status: StatusCode,
    pub headers: Headers,
    pub body: Body,
    /// Declared body length. Left at zero by the constructors; finalization
    /// fills it from the body when unset and the body is not chunk-encoded.
    pub content_length: usize,
    pub is_chunk_encoded: bool,
    /// When set, delegates final response production; see [`CustomResponder`].
    pub custom_responder: Option<Arc<dyn CustomResponder>>,
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("content_length", &self.content_length)
            .field("is_chunk_encoded", &self.is_chunk_encoded)
            .field("custom_responder", &self.custom_responder.is_some())
            .finish()
    }
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Response {
            status,
            ..Response::default()
        }
    }

    /// Plain-text response.
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        let mut response = Response::new(status);
        response.headers.set("Content-Type", "text/plain");
        response.body = Body::Buffer(body.into().into_bytes());
        response
    }

    /// JSON response; the body is the compact rendering of `value`.
    pub fn json(status: StatusCode, value: serde_json::Value) -> Self {
        let mut response = Response::new(status);
        response.headers.set("Content-Type", "application/json");
        response.body = Body::Buffer(value.to_string().into_bytes());
        response
    }

    /// Chunk-encoded response from pre-split chunks.
    pub fn chunked(status: StatusCode, chunks: Vec<Vec<u8>>) -> Self {
        let mut response = Response::new(status);
        response.body = Body::Chunked(chunks);
        response.is_chunk_encoded = true;
        response
    }

    /// Response whose body is produced by a streaming sender.
    pub fn streamed(sender: Arc<dyn BodySender>) -> Self {
        Response {
            body: Body::Sender(sender),
            ..Response::default()
        }
    }

    pub fn with_custom_responder(mut self, responder: Arc<dyn CustomResponder>) -> Self {
        self.custom_responder = Some(responder);
        self
    }

    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.set(name, value);
    }

    /// Merge `later` over `self`, right-biased per field.
    ///
    /// Later status always wins; later header values override per key while
    /// keys unique to the earlier response survive; a non-empty later body
    /// replaces the earlier one together with its length and encoding flags;
    /// a later custom responder replaces an earlier one when present. This is
    /// how a partial response contributed by middleware is completed by the
    /// route handler's response.
    pub fn merged(self, later: Response) -> Response {
        let mut merged = self;
        merged.status = later.status;
        merged.headers.merge_from(later.headers);
        if !later.body.is_empty() {
            merged.body = later.body;
            merged.content_length = later.content_length;
            merged.is_chunk_encoded = later.is_chunk_encoded;
        }
        if later.custom_responder.is_some() {
            merged.custom_responder = later.custom_responder;
        }
        merged
    }

    /// Serialize the status line, headers and buffered body to wire bytes.
    ///
    /// `Content-Length` and `Transfer-Encoding` are emitted from the
    /// response's own fields unless the application already set them as
    /// headers. A [`Body::Sender`] contributes nothing here; the dispatcher
    /// hands the stream to the sender instead of calling this.
    pub fn serialize(&self) -> Vec<u8> {
        let reason = self.status.canonical_reason().unwrap_or("Unknown");
        let mut out = Vec::with_capacity(128 + self.body.byte_len());
        out.extend_from_slice(
            format!("HTTP/1.1 {} {}\r\n", self.status.as_u16(), reason).as_bytes(),
        );
        for (name, value) in self.headers.iter() {
            out.extend_from_slice(name.as_bytes());
            out.extend_from_slice(b": ");
            out.extend_from_slice(value.as_bytes());
            out.extend_from_slice(b"\r\n");
        }
        if self.is_chunk_encoded {
            if !self.headers.contains("transfer-encoding") {
                out.extend_from_slice(b"Transfer-Encoding: chunked\r\n");
            }
        } else if !self.headers.contains("content-length") {
            out.extend_from_slice(format!("Content-Length: {}\r\n", self.content_length).as_bytes());
        }
        out.extend_from_slice(b"\r\n");
        match &self.body {
            Body::Buffer(bytes) => out.extend_from_slice(bytes),
            Body::Chunked(chunks) => {
                for chunk in chunks {
                    out.extend_from_slice(format!("{:X}\r\n", chunk.len()).as_bytes());
                    out.extend_from_slice(chunk);
                    out.extend_from_slice(b"\r\n");
                }
                out.extend_from_slice(b"0\r\n\r\n");
            }
            Body::Sender(_) => {}
        }
        out
    }
}

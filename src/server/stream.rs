use std::io::{self, Write};
use std::net::Shutdown;

/// Outbound side of one network connection.
///
/// One stream maps to exactly one underlying connection and may carry
/// several sequential requests while keep-alive holds. Both operations can
/// fail; by the dispatcher's contract close failures are swallowed and send
/// failures on streaming paths convert to a best-effort close, so
/// implementations never need retry logic.
pub trait HttpStream: Send {
    fn send(&mut self, bytes: &[u8]) -> io::Result<()>;
    fn close(&mut self) -> io::Result<()>;
}

impl HttpStream for may::net::TcpStream {
    fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.write_all(bytes)?;
        self.flush()
    }

    fn close(&mut self) -> io::Result<()> {
        self.shutdown(Shutdown::Both)
    }
}

use std::time::Duration;

/// Socket and lifecycle options the embedding host applies at listen time.
///
/// Assembled alongside the [`App`](super::App) and treated as immutable once
/// the host starts accepting. The dispatch core consumes none of these
/// directly; they travel with the [`Service`](super::Service) so host code
/// has one place to read them from.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind, e.g. `0.0.0.0`.
    pub host: String,
    /// TCP port to listen on.
    pub port: u16,
    /// Listen backlog size.
    pub backlog: u32,
    /// How long an idle keep-alive connection may linger before the host
    /// closes it.
    pub keep_alive_timeout: Duration,
    /// Disable Nagle's algorithm on accepted sockets.
    pub no_delay: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            backlog: 1024,
            keep_alive_timeout: Duration::from_secs(75),
            no_delay: true,
        }
    }
}

impl ServerConfig {
    /// `host:port` form usable with `ToSocketAddrs`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_addr_is_wildcard_3000() {
        assert_eq!(ServerConfig::default().addr(), "0.0.0.0:3000");
    }
}

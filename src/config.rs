//! Connection configuration.

use std::time::Duration;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 6379;

/// Capacity of the buffered reader wrapped around the socket (16 KB)
pub const DEFAULT_READ_BUFFER_SIZE: usize = 16 * 1024;

/// Maximum array nesting depth accepted in a reply
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Maximum size for a single bulk string (512 MB, same as Redis)
pub const DEFAULT_MAX_BULK_LEN: usize = 512 * 1024 * 1024;

/// Settings for a [`Connection`](crate::Connection).
///
/// `None` timeouts block indefinitely. Only the send path has a timeout by
/// default; a server that accepts a request and never answers blocks the
/// reading thread unless `read_timeout` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    /// Send timeout applied to the socket
    pub io_timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    pub read_timeout: Option<Duration>,
    pub read_buffer_size: usize,
    pub max_depth: usize,
    pub max_bulk_len: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            io_timeout: None,
            connect_timeout: None,
            read_timeout: None,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
            max_bulk_len: DEFAULT_MAX_BULK_LEN,
        }
    }
}

impl ConnectionConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Sets the send timeout. A zero duration means no timeout.
    pub fn with_io_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.io_timeout = non_zero(timeout);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = non_zero(timeout);
        self
    }

    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = non_zero(timeout);
        self
    }

    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.max(1);
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_max_bulk_len(mut self, len: usize) -> Self {
        self.max_bulk_len = len;
        self
    }

    /// Returns the `host:port` address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The socket APIs reject zero durations; treat them as "no timeout".
fn non_zero(timeout: Option<Duration>) -> Option<Duration> {
    timeout.filter(|t| !t.is_zero())
}

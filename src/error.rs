//! Error types for the RESP client.

use std::io;
use thiserror::Error;

/// Errors returned by connections, pipelines and the reply decoder.
#[derive(Debug, Error)]
pub enum Error {
    /// The socket could not be established
    #[error("could not connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// An established socket failed while writing or reading
    #[error("connection error: {0}")]
    Connection(#[from] io::Error),

    /// Unknown type tag, malformed length, or nesting too deep
    #[error("protocol error: {0}")]
    Protocol(String),

    /// A line that should hold an integer is not numeric
    #[error("invalid integer: {0:?}")]
    Parse(String),

    /// The server answered with an error reply
    #[error("server error: {0}")]
    Server(String),
}

impl Error {
    /// Returns true for failures of the transport itself.
    ///
    /// After one of these the connection has dropped its socket and the next
    /// command will attempt a fresh connect.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::Connect { .. } | Error::Connection(_))
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_errors_are_grouped() {
        let connect = Error::Connect {
            addr: "127.0.0.1:1".to_string(),
            source: io::Error::from(io::ErrorKind::ConnectionRefused),
        };
        let io = Error::from(io::Error::from(io::ErrorKind::UnexpectedEof));

        assert!(connect.is_connection_error());
        assert!(io.is_connection_error());
        assert!(!Error::Protocol("bad".into()).is_connection_error());
        assert!(!Error::Server("ERR".into()).is_connection_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Error::Parse("abc".into()).to_string(),
            "invalid integer: \"abc\""
        );
        assert_eq!(
            Error::Server("ERR unknown command".into()).to_string(),
            "server error: ERR unknown command"
        );
    }
}

//! Client Connection
//!
//! A [`Connection`] owns one TCP socket to a RESP server, wrapped in a
//! buffered reader. Requests are written straight to the socket; replies are
//! decoded from the buffer.
//!
//! ## Lifecycle
//!
//! ```text
//! new() ──> (unconnected) ──send──> connect() ──> (connected)
//!                ▲                                    │
//!                │          I/O or protocol error     │
//!                └────────────── dispose() <──────────┘
//! ```
//!
//! Sending on an unconnected `Connection` connects first. When a write or a
//! read fails the socket is dropped and the error is returned; the failed
//! command is not retried, the next one starts with a fresh connect.
//!
//! Dropping a `Connection` closes the socket.

use crate::config::ConnectionConfig;
use crate::connection::pipeline::Pipeline;
use crate::decode;
use crate::error::{Error, Result};
use crate::protocol::{Frame, Reply, ReplyDecoder};
use bytes::Bytes;
use std::io::{self, BufReader, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// A blocking connection to a RESP server.
///
/// Not internally synchronized: every operation takes `&mut self`. Use one
/// connection per thread, or wrap it in a `Mutex`.
#[derive(Debug)]
pub struct Connection {
    config: ConnectionConfig,

    /// Reply decoder built from the configured limits
    decoder: ReplyDecoder,

    /// The socket, present only while connected
    stream: Option<BufReader<TcpStream>>,
}

/// Opens a connection to `host:port` with the given send timeout.
///
/// # Example
///
/// ```ignore
/// let mut conn = resp_client::connect("127.0.0.1", 6379, None)?;
/// let pong = conn.send_command("PING")?;
/// ```
pub fn connect(host: &str, port: u16, io_timeout: Option<Duration>) -> Result<Connection> {
    Connection::open(ConnectionConfig::new(host, port).with_io_timeout(io_timeout))
}

impl Connection {
    /// Creates an unconnected `Connection`. The socket is opened by the first
    /// command or by [`connect`](Self::connect).
    pub fn new(config: ConnectionConfig) -> Self {
        let decoder = ReplyDecoder::new(config.max_depth, config.max_bulk_len);
        Self {
            config,
            decoder,
            stream: None,
        }
    }

    /// Creates a `Connection` and connects it immediately.
    pub fn open(config: ConnectionConfig) -> Result<Self> {
        let mut conn = Self::new(config);
        conn.connect()?;
        Ok(conn)
    }

    /// Opens the socket, replacing any previous one.
    pub fn connect(&mut self) -> Result<()> {
        self.dispose();

        let addr = self.config.addr();
        let socket = self.open_socket().map_err(|source| Error::Connect {
            addr: addr.clone(),
            source,
        })?;

        info!(server = %addr, "Connected");
        self.stream = Some(BufReader::with_capacity(
            self.config.read_buffer_size,
            socket,
        ));
        Ok(())
    }

    fn open_socket(&self) -> io::Result<TcpStream> {
        let host = self.config.host.as_str();
        let port = self.config.port;

        let socket = match self.config.connect_timeout {
            Some(timeout) => connect_timeout(host, port, timeout)?,
            None => TcpStream::connect((host, port))?,
        };

        socket.set_nodelay(true)?;
        socket.set_write_timeout(self.config.io_timeout)?;
        socket.set_read_timeout(self.config.read_timeout)?;
        Ok(socket)
    }

    /// Sends an inline command and returns its reply.
    ///
    /// The text is sent verbatim followed by CRLF, so it must not contain
    /// CR or LF. Use [`send_command_args`](Self::send_command_args) for
    /// binary data.
    pub fn send_command(&mut self, command: &str) -> Result<Reply> {
        self.send_frame_with(&Frame::inline(command), decode::raw)
    }

    /// Sends an inline command, passing bulk strings of the reply through
    /// `decode`.
    pub fn send_command_decoded<T, F>(&mut self, command: &str, decode: F) -> Result<Reply<T>>
    where
        F: Fn(Bytes) -> T,
    {
        self.send_frame_with(&Frame::inline(command), decode)
    }

    /// Sends a binary-safe command and returns its reply.
    ///
    /// # Example
    ///
    /// ```ignore
    /// conn.send_command_args("SET", &[&b"key"[..], &b"\x00\x01"[..]])?;
    /// ```
    pub fn send_command_args<N, A>(&mut self, name: N, args: &[A]) -> Result<Reply>
    where
        N: AsRef<[u8]>,
        A: AsRef<[u8]>,
    {
        self.send_frame_with(&Frame::command(name, args), decode::raw)
    }

    /// Sends a binary-safe command, passing bulk strings of the reply
    /// through `decode`.
    pub fn send_command_args_decoded<N, A, T, F>(
        &mut self,
        name: N,
        args: &[A],
        decode: F,
    ) -> Result<Reply<T>>
    where
        N: AsRef<[u8]>,
        A: AsRef<[u8]>,
        F: Fn(Bytes) -> T,
    {
        self.send_frame_with(&Frame::command(name, args), decode)
    }

    /// Writes an encoded frame and decodes exactly one reply.
    pub fn send_frame_with<T, F>(&mut self, frame: &Frame, decode: F) -> Result<Reply<T>>
    where
        F: Fn(Bytes) -> T,
    {
        self.write_payload(frame.as_bytes())?;
        self.read_reply(decode)
    }

    /// Starts a pipeline whose bulk strings stay raw bytes.
    pub fn pipeline(&mut self) -> Pipeline<'_, Bytes> {
        Pipeline::new(self, decode::raw)
    }

    /// Starts a pipeline that applies `decode` to bulk strings of every reply
    /// queued without its own decode function.
    pub fn pipeline_with<'c, T, F>(&'c mut self, decode: F) -> Pipeline<'c, T>
    where
        F: Fn(Bytes) -> T + 'c,
    {
        Pipeline::new(self, decode)
    }

    /// Writes raw request bytes in one call, connecting first if needed.
    pub(crate) fn write_payload(&mut self, payload: &[u8]) -> Result<()> {
        if self.stream.is_none() {
            debug!(server = %self.config.addr(), "Not connected, connecting");
            self.connect()?;
        }

        let result = match self.stream.as_mut() {
            Some(stream) => {
                let socket = stream.get_mut();
                socket.write_all(payload).and_then(|()| socket.flush())
            }
            None => Err(io::Error::from(io::ErrorKind::NotConnected)),
        };

        match result {
            Ok(()) => {
                trace!(bytes = payload.len(), "Sent request");
                Ok(())
            }
            Err(e) => {
                warn!(server = %self.config.addr(), error = %e, "Write failed, dropping connection");
                self.dispose();
                Err(Error::Connection(e))
            }
        }
    }

    /// Decodes one reply from the socket.
    ///
    /// Any failure leaves the stream in the middle of a reply, so the socket
    /// is dropped.
    pub(crate) fn read_reply<T, F>(&mut self, decode: F) -> Result<Reply<T>>
    where
        F: Fn(Bytes) -> T,
    {
        let Some(stream) = self.stream.as_mut() else {
            return Err(Error::Connection(io::Error::from(
                io::ErrorKind::NotConnected,
            )));
        };

        match self.decoder.decode(stream, decode) {
            Ok(reply) => {
                trace!("Received reply");
                Ok(reply)
            }
            Err(e) => {
                warn!(server = %self.config.addr(), error = %e, "Read failed, dropping connection");
                self.dispose();
                Err(e)
            }
        }
    }

    /// Closes the socket. Calling it again, or on a connection that never
    /// connected, does nothing.
    pub fn dispose(&mut self) {
        let Some(stream) = self.stream.take() else {
            return;
        };

        // Buffered but unread reply bytes are discarded with the reader
        let socket = stream.into_inner();
        if let Err(e) = socket.shutdown(Shutdown::Both) {
            debug!(error = %e, "Socket shutdown failed");
        }
        info!(server = %self.config.addr(), "Connection closed");
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn host(&self) -> &str {
        &self.config.host
    }

    pub fn port(&self) -> u16 {
        self.config.port
    }

    pub fn io_timeout(&self) -> Option<Duration> {
        self.config.io_timeout
    }

    /// Returns the server address while connected.
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.stream.as_ref()?.get_ref().peer_addr().ok()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Tries every resolved address in turn, each with `timeout`.
fn connect_timeout(host: &str, port: u16, timeout: Duration) -> io::Result<TcpStream> {
    let mut last_err = None;
    for addr in (host, port).to_socket_addrs()? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(socket) => return Ok(socket),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "could not resolve to any address",
        )
    }))
}

//! Pipelining
//!
//! A [`Pipeline`] queues commands locally and sends them all in one write,
//! then reads back one reply per command in the order they were queued.
//!
//! ```text
//!   queue("SET a 1")  ─┐
//!   queue("INCR a")   ─┼─> execute() ──> one write ──> [reply 1, reply 2, reply 3]
//!   queue("GET a")    ─┘
//! ```
//!
//! ## States
//!
//! - `Building`: commands are being queued
//! - `Executing`: the batch has been taken off the queue and is on the wire
//! - `Drained`: execution finished (successfully or not), the queue is empty
//!   and the pipeline can be reused for a new round
//!
//! A failure during execution discards the replies already decoded; RESP has
//! no way to tell the server to skip the remaining commands.

use crate::connection::client::Connection;
use crate::error::Result;
use crate::protocol::{concat, Frame, Reply};
use bytes::Bytes;
use std::fmt;
use tracing::debug;

type DecodeFn<'c, T> = Box<dyn Fn(Bytes) -> T + 'c>;

/// Where a pipeline is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Building,
    Executing,
    Drained,
}

/// A queued request and the decode function for its reply, if it has its own.
struct Queued<'c, T> {
    frame: Frame,
    decode: Option<DecodeFn<'c, T>>,
}

/// A batch of commands bound to one [`Connection`].
///
/// The pipeline borrows the connection mutably, so no other command or
/// pipeline can use it until the pipeline is dropped.
pub struct Pipeline<'c, T = Bytes> {
    conn: &'c mut Connection,
    default_decode: DecodeFn<'c, T>,
    queued: Vec<Queued<'c, T>>,
    state: PipelineState,
}

impl<'c, T> Pipeline<'c, T> {
    pub(crate) fn new<F>(conn: &'c mut Connection, default_decode: F) -> Self
    where
        F: Fn(Bytes) -> T + 'c,
    {
        Self {
            conn,
            default_decode: Box::new(default_decode),
            queued: Vec::new(),
            state: PipelineState::Building,
        }
    }

    /// Queues an inline command.
    pub fn queue(&mut self, command: &str) -> &mut Self {
        self.push(Frame::inline(command), None)
    }

    /// Queues an inline command with its own decode function.
    pub fn queue_with<F>(&mut self, command: &str, decode: F) -> &mut Self
    where
        F: Fn(Bytes) -> T + 'c,
    {
        self.push(Frame::inline(command), Some(Box::new(decode)))
    }

    /// Queues a binary-safe command.
    pub fn queue_args<N, A>(&mut self, name: N, args: &[A]) -> &mut Self
    where
        N: AsRef<[u8]>,
        A: AsRef<[u8]>,
    {
        self.push(Frame::command(name, args), None)
    }

    /// Queues a binary-safe command with its own decode function.
    pub fn queue_args_with<N, A, F>(&mut self, name: N, args: &[A], decode: F) -> &mut Self
    where
        N: AsRef<[u8]>,
        A: AsRef<[u8]>,
        F: Fn(Bytes) -> T + 'c,
    {
        self.push(Frame::command(name, args), Some(Box::new(decode)))
    }

    /// Queues an already encoded frame.
    pub fn queue_frame(&mut self, frame: Frame) -> &mut Self {
        self.push(frame, None)
    }

    fn push(&mut self, frame: Frame, decode: Option<DecodeFn<'c, T>>) -> &mut Self {
        self.queued.push(Queued { frame, decode });
        self.state = PipelineState::Building;
        self
    }

    /// Number of queued commands.
    pub fn len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Sends every queued command in a single write and returns the replies
    /// in queue order.
    ///
    /// The queue is emptied even when execution fails. An empty pipeline
    /// returns no replies without touching the network.
    pub fn execute(&mut self) -> Result<Vec<Reply<T>>> {
        let queued = std::mem::take(&mut self.queued);
        if queued.is_empty() {
            self.state = PipelineState::Drained;
            return Ok(Vec::new());
        }

        self.state = PipelineState::Executing;
        let result = self.run(&queued);
        self.state = PipelineState::Drained;
        result
    }

    /// The whole batch goes out through a single `write_payload` call.
    fn run(&mut self, queued: &[Queued<'c, T>]) -> Result<Vec<Reply<T>>> {
        let payload = encode_batch(queued);
        debug!(
            commands = queued.len(),
            bytes = payload.len(),
            "Executing pipeline"
        );
        self.conn.write_payload(&payload)?;

        let mut replies = Vec::with_capacity(queued.len());
        for entry in queued {
            let decode: &dyn Fn(Bytes) -> T = match &entry.decode {
                Some(decode) => &**decode,
                None => &*self.default_decode,
            };
            replies.push(self.conn.read_reply(decode)?);
        }
        Ok(replies)
    }
}

/// Joins the queued frames into the one payload a pipeline writes.
fn encode_batch<T>(queued: &[Queued<'_, T>]) -> Bytes {
    concat(queued.iter().map(|q| &q.frame))
}

impl<T> fmt::Debug for Pipeline<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("server", &self.conn.config().addr())
            .field("queued", &self.queued.len())
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectionConfig;
    use crate::connection::mock::{config_for, read_exactly, serve};
    use crate::decode;
    use crate::error::Error;
    use std::io::Write;
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_three_inline_commands_split_replies() {
        let request = b"SET a 1\r\nINCR a\r\nGET a\r\n";
        let (addr, server) = serve(move |listener| {
            let (mut socket, _) = listener.accept().unwrap();
            assert_eq!(read_exactly(&mut socket, request.len()), request);

            // Replies trickle in, cutting through type tags and lengths
            let replies = b"+OK\r\n:2\r\n$1\r\n2\r\n";
            for chunk in replies.chunks(3) {
                socket.write_all(chunk).unwrap();
                socket.flush().unwrap();
                thread::sleep(Duration::from_millis(5));
            }
        });

        let mut conn = Connection::new(config_for(addr));
        let mut pipeline = conn.pipeline();
        pipeline.queue("SET a 1").queue("INCR a").queue("GET a");
        assert_eq!(pipeline.len(), 3);
        // All three commands leave as one contiguous write
        assert_eq!(&encode_batch(&pipeline.queued)[..], &request[..]);

        let replies = pipeline.execute().unwrap();
        assert_eq!(
            replies,
            vec![
                Reply::SimpleString("OK".into()),
                Reply::Integer(2),
                Reply::BulkString(Bytes::from("2")),
            ]
        );
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.state(), PipelineState::Drained);
        server.join().unwrap();
    }

    #[test]
    fn test_mixed_frames_and_decoders() {
        let frames = [
            Frame::command("SET", &["k", "héllo"]),
            Frame::command("GET", &["k"]),
            Frame::inline("GET k"),
        ];
        let request = concat(&frames).to_vec();

        let (addr, server) = serve(move |listener| {
            let (mut socket, _) = listener.accept().unwrap();
            assert_eq!(read_exactly(&mut socket, request.len()), request);
            let mut replies = b"+OK\r\n".to_vec();
            replies.extend_from_slice(b"$6\r\n");
            replies.extend_from_slice("héllo".as_bytes());
            replies.extend_from_slice(b"\r\n$6\r\n");
            replies.extend_from_slice("héllo".as_bytes());
            replies.extend_from_slice(b"\r\n");
            socket.write_all(&replies).unwrap();
        });

        let mut conn = Connection::new(config_for(addr));
        let mut pipeline = conn.pipeline_with(decode::utf8_lossy);
        pipeline
            .queue_args("SET", &["k", "héllo"])
            .queue_args("GET", &["k"])
            .queue_with("GET k", |b| format!("{} bytes", b.len()));

        let replies = pipeline.execute().unwrap();
        assert_eq!(
            replies,
            vec![
                Reply::SimpleString("OK".into()),
                Reply::BulkString("héllo".to_string()),
                Reply::BulkString("6 bytes".to_string()),
            ]
        );
        server.join().unwrap();
    }

    #[test]
    fn test_reuse_after_execute() {
        let (addr, server) = serve(|listener| {
            let (mut socket, _) = listener.accept().unwrap();
            read_exactly(&mut socket, 6);
            socket.write_all(b"+PONG\r\n").unwrap();
            read_exactly(&mut socket, 12);
            socket.write_all(b":1\r\n:2\r\n").unwrap();
        });

        let mut conn = Connection::new(config_for(addr));
        let mut pipeline = conn.pipeline();
        assert_eq!(pipeline.state(), PipelineState::Building);

        pipeline.queue("PING");
        assert_eq!(pipeline.execute().unwrap().len(), 1);
        assert_eq!(pipeline.state(), PipelineState::Drained);

        pipeline.queue("INCR").queue("INCR");
        assert_eq!(pipeline.state(), PipelineState::Building);
        assert_eq!(
            pipeline.execute().unwrap(),
            vec![Reply::Integer(1), Reply::Integer(2)]
        );
        drop(pipeline);
        assert!(conn.is_connected());
        server.join().unwrap();
    }

    #[test]
    fn test_empty_pipeline_skips_network() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };

        let mut conn = Connection::new(config_for(addr));
        let mut pipeline = conn.pipeline();
        assert!(pipeline.execute().unwrap().is_empty());
        assert_eq!(pipeline.state(), PipelineState::Drained);
        drop(pipeline);
        assert!(!conn.is_connected());
    }

    #[test]
    fn test_failure_discards_partial_results() {
        let (addr, server) = serve(|listener| {
            let (mut socket, _) = listener.accept().unwrap();
            read_exactly(&mut socket, 12);
            // Only one of two replies, then hang up
            socket.write_all(b"+PONG\r\n").unwrap();
        });

        let mut conn = Connection::new(config_for(addr));
        let mut pipeline = conn.pipeline();
        pipeline.queue("PING").queue("PING");

        let err = pipeline.execute().unwrap_err();
        assert!(matches!(err, Error::Connection(_)));
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.state(), PipelineState::Drained);
        drop(pipeline);
        assert!(!conn.is_connected());
        server.join().unwrap();
    }

    #[test]
    fn test_connect_failure_drains_queue() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };

        let mut conn = Connection::new(config_for(addr));
        let mut pipeline = conn.pipeline();
        pipeline.queue_args("GET", &["k"]);
        assert!(matches!(pipeline.execute(), Err(Error::Connect { .. })));
        assert!(pipeline.is_empty());
    }

    #[test]
    fn test_debug_output() {
        let mut conn = Connection::new(ConnectionConfig::new("127.0.0.1", 7000));
        let mut pipeline = conn.pipeline();
        pipeline.queue_frame(Frame::inline("PING"));
        let debug = format!("{:?}", pipeline);
        assert!(debug.contains("127.0.0.1:7000"));
        assert!(debug.contains("queued: 1"));
        assert!(debug.contains("Building"));
    }
}

//! # resp-client - A Blocking RESP Client
//!
//! `resp-client` speaks the Redis Serialization Protocol (RESP v2) over a
//! plain blocking TCP socket. It encodes commands, decodes replies and
//! batches commands into a single round trip.
//!
//! ## Features
//!
//! - **Binary-Safe Commands**: arguments are length-prefixed, so any bytes
//!   can be sent, including `\0`, `\r` and `\n`
//! - **Inline Commands**: plain text requests like `INFO all`
//! - **Typed Replies**: server errors are their own variant, null replies are
//!   distinct from empty ones
//! - **Decode Functions**: bulk strings can be turned into any type while the
//!   reply is read
//! - **Pipelining**: queue many commands, send them in one write
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              resp-client                                │
//! │                                                                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐                  │
//! │  │  Pipeline   │───>│ Connection  │───>│   Encoder   │───> socket       │
//! │  │  (batches)  │    │ (lifecycle) │    │  (Frames)   │                  │
//! │  └─────────────┘    └──────┬──────┘    └─────────────┘                  │
//! │                            │                                            │
//! │                            ▼                                            │
//! │                     ┌─────────────┐    ┌─────────────┐                  │
//! │                     │   Decoder   │───>│   Line      │<─── socket       │
//! │                     │  (Replies)  │    │   Scanner   │                  │
//! │                     └─────────────┘    └─────────────┘                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use resp_client::{connect, decode, Reply};
//!
//! fn main() -> resp_client::Result<()> {
//!     let mut conn = connect("127.0.0.1", 6379, None)?;
//!
//!     // Inline command
//!     assert_eq!(conn.send_command("PING")?, Reply::SimpleString("PONG".into()));
//!
//!     // Binary-safe command
//!     conn.send_command_args("SET", &[&b"key"[..], &b"\x00\xff"[..]])?;
//!
//!     // Bulk strings decoded as text
//!     let info = conn.send_command_decoded("INFO server", decode::utf8_lossy)?;
//!
//!     // Three commands, one write
//!     let replies = conn
//!         .pipeline()
//!         .queue("INCR counter")
//!         .queue("INCR counter")
//!         .queue_args("GET", &["counter"])
//!         .execute()?;
//!
//!     conn.dispose();
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`protocol`]: reply types, line scanner, decoder and encoder
//! - [`connection`]: the blocking connection and pipelines
//! - [`config`]: connection settings
//! - [`decode`]: ready-made bulk string decode functions
//! - [`error`]: error types
//!
//! ## Concurrency
//!
//! Everything is synchronous. A [`Connection`] is not internally
//! synchronized; share it across threads only behind a lock.

pub mod config;
pub mod connection;
pub mod decode;
pub mod error;
pub mod protocol;

// Re-export commonly used types for convenience
pub use config::ConnectionConfig;
pub use connection::{connect, Connection, Pipeline, PipelineState};
pub use error::{Error, Result};
pub use protocol::{Frame, Reply, ReplyDecoder};

/// The default port of a RESP server (same as Redis)
pub const DEFAULT_PORT: u16 = config::DEFAULT_PORT;

/// The default host to connect to
pub const DEFAULT_HOST: &str = config::DEFAULT_HOST;

/// Version of resp-client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

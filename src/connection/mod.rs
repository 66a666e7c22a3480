//! Client Connection Module
//!
//! This module manages the client side of a RESP conversation: one blocking
//! TCP socket per [`Connection`], with commands sent either immediately or in
//! batches through a [`Pipeline`].
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Caller                               │
//! └──────────────┬───────────────────────────────┬──────────────┘
//!                │ send_command()                │ pipeline().queue()...
//!                ▼                               ▼
//! ┌──────────────────────────┐      ┌──────────────────────────┐
//! │       Connection         │<─────│        Pipeline          │
//! │                          │      │  (one write per batch)   │
//! │  ┌────────┐  ┌────────┐  │      └──────────────────────────┘
//! │  │ Encode │─>│ Write  │  │
//! │  └────────┘  └────────┘  │
//! │  ┌────────┐  ┌────────┐  │
//! │  │ Decode │<─│ Buffer │  │
//! │  └────────┘  └────────┘  │
//! └──────────────────────────┘
//! ```
//!
//! ## Features
//!
//! - **Lazy Connect**: the socket is opened by the first command
//! - **Reconnect on Demand**: a failed socket is dropped and the next
//!   command connects again
//! - **Pipelining**: many commands, one write, replies in queue order
//! - **Scoped Cleanup**: dropping a `Connection` closes its socket
//!
//! ## Example
//!
//! ```ignore
//! use resp_client::{Connection, ConnectionConfig};
//!
//! let mut conn = Connection::open(ConnectionConfig::new("127.0.0.1", 6379))?;
//! conn.send_command_args("SET", &["name", "Ariz"])?;
//!
//! let replies = conn
//!     .pipeline()
//!     .queue("PING")
//!     .queue_args("GET", &["name"])
//!     .execute()?;
//! ```

pub mod client;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod mock;

// Re-export commonly used types
pub use client::{connect, Connection};
pub use pipeline::{Pipeline, PipelineState};

//! RESP Protocol Implementation
//!
//! This module implements the client side of the Redis Serialization
//! Protocol (RESP v2): encoding requests and decoding replies.
//!
//! ## Modules
//!
//! - `types`: Defines the `Reply` enum and its wire serialization
//! - `scanner`: CRLF line reader used for every text and length field
//! - `decoder`: Reads one reply from a buffered stream
//! - `encoder`: Builds inline and binary-safe request frames
//!
//! ## Example
//!
//! ```
//! use resp_client::protocol::{Frame, Reply, ReplyDecoder};
//! use resp_client::decode;
//! use std::io::Cursor;
//!
//! // Encoding a request
//! let frame = Frame::command("GET", &["name"]);
//! assert_eq!(frame.as_bytes(), b"*2\r\n$3\r\nGET\r\n$4\r\nname\r\n");
//!
//! // Decoding a reply
//! let mut input = Cursor::new(&b"*2\r\n:1\r\n$-1\r\n"[..]);
//! let reply = ReplyDecoder::default().decode(&mut input, decode::raw).unwrap();
//! assert_eq!(reply, Reply::Array(vec![Reply::Integer(1), Reply::NullBulk]));
//! ```

pub mod decoder;
pub mod encoder;
pub mod scanner;
pub mod types;

// Re-export commonly used types for convenience
pub use decoder::ReplyDecoder;
pub use encoder::{concat, Frame};
pub use scanner::read_line;
pub use types::Reply;

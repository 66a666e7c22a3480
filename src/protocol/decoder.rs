//! RESP Reply Decoder
//!
//! Reads exactly one reply from a blocking byte stream.
//!
//! ## How the Decoder Works
//!
//! 1. Read one type tag byte
//! 2. Read the line after it with the [line scanner](super::scanner)
//! 3. Depending on the tag, return a value, read a bulk payload, or open an
//!    array and keep reading its elements
//!
//! Arrays are assembled on an explicit stack instead of by recursion, so a
//! deeply nested reply cannot overflow the call stack. Nesting beyond
//! `max_depth` is rejected with a protocol error before it grows memory
//! without bound.
//!
//! ## Bulk String Transforms
//!
//! Every bulk string leaf, at any depth, is passed through the caller's
//! decode function. Use [`crate::decode::raw`] to keep the bytes as they
//! are.

use crate::config::{DEFAULT_MAX_BULK_LEN, DEFAULT_MAX_DEPTH};
use crate::error::{Error, Result};
use crate::protocol::scanner::read_line;
use crate::protocol::types::{prefix, Reply, CRLF};
use bytes::Bytes;
use std::io::{self, BufRead, Read};
use tracing::trace;

/// Cap on up-front allocation for array elements
const MAX_PREALLOC: usize = 1024;

/// Cap on up-front allocation for a bulk payload, in bytes
const MAX_BULK_PREALLOC: usize = 64 * 1024;

/// Decodes replies according to a set of limits.
#[derive(Debug, Clone, Copy)]
pub struct ReplyDecoder {
    max_depth: usize,
    max_bulk_len: usize,
}

impl Default for ReplyDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH, DEFAULT_MAX_BULK_LEN)
    }
}

/// What a single tag-and-line step produced.
enum Step<T> {
    Value(Reply<T>),
    OpenArray(usize),
}

/// An array whose elements are still being read.
struct PendingArray<T> {
    len: usize,
    items: Vec<Reply<T>>,
}

impl ReplyDecoder {
    /// Creates a decoder that rejects arrays nested deeper than `max_depth`
    /// and bulk strings longer than `max_bulk_len` bytes.
    pub fn new(max_depth: usize, max_bulk_len: usize) -> Self {
        Self {
            max_depth,
            max_bulk_len,
        }
    }

    /// Reads one complete reply, applying `decode` to every bulk string.
    ///
    /// # Example
    ///
    /// ```
    /// use resp_client::protocol::{Reply, ReplyDecoder};
    /// use std::io::Cursor;
    ///
    /// let mut input = Cursor::new(&b"$6\r\nfoobar\r\n"[..]);
    /// let reply = ReplyDecoder::default()
    ///     .decode(&mut input, |b| String::from_utf8_lossy(&b).into_owned())
    ///     .unwrap();
    /// assert_eq!(reply, Reply::BulkString("foobar".to_string()));
    /// ```
    pub fn decode<R, T, F>(&self, reader: &mut R, decode: F) -> Result<Reply<T>>
    where
        R: BufRead,
        F: Fn(Bytes) -> T,
    {
        let mut stack: Vec<PendingArray<T>> = Vec::new();

        loop {
            let mut value = match self.step(reader, &decode)? {
                Step::Value(value) => value,
                Step::OpenArray(len) => {
                    if stack.len() >= self.max_depth {
                        return Err(Error::Protocol(format!(
                            "maximum nesting depth exceeded: {}",
                            self.max_depth
                        )));
                    }
                    stack.push(PendingArray {
                        len,
                        items: Vec::with_capacity(len.min(MAX_PREALLOC)),
                    });
                    continue;
                }
            };

            // Hand the finished value to its parent, closing every array it completes
            loop {
                let Some(mut parent) = stack.pop() else {
                    return Ok(value);
                };
                parent.items.push(value);
                if parent.items.len() < parent.len {
                    stack.push(parent);
                    break;
                }
                trace!(len = parent.len, depth = stack.len(), "Decoded array");
                value = Reply::Array(parent.items);
            }
        }
    }

    /// Reads one tag and its line; for bulk strings also the payload.
    fn step<R, T, F>(&self, reader: &mut R, decode: &F) -> Result<Step<T>>
    where
        R: BufRead,
        F: Fn(Bytes) -> T,
    {
        let tag = read_tag(reader)?;

        match tag {
            prefix::SIMPLE_STRING => Ok(Step::Value(Reply::SimpleString(read_text(reader)?))),
            prefix::ERROR => Ok(Step::Value(Reply::Error(read_text(reader)?))),
            prefix::INTEGER => Ok(Step::Value(Reply::Integer(read_integer(reader)?))),
            prefix::BULK_STRING => {
                let Some(len) = read_length(reader, "bulk string")? else {
                    return Ok(Step::Value(Reply::NullBulk));
                };
                if len > self.max_bulk_len {
                    return Err(Error::Protocol(format!(
                        "bulk string too large: {} bytes (max: {})",
                        len, self.max_bulk_len
                    )));
                }
                let data = read_bulk(reader, len)?;
                Ok(Step::Value(Reply::BulkString(decode(data))))
            }
            prefix::ARRAY => match read_length(reader, "array")? {
                None => Ok(Step::Value(Reply::NullArray)),
                Some(0) => Ok(Step::Value(Reply::Array(Vec::new()))),
                Some(len) => Ok(Step::OpenArray(len)),
            },
            other => Err(Error::Protocol(format!(
                "unknown type prefix: {:#04x}",
                other
            ))),
        }
    }
}

/// Reads the type tag. End of stream here means the server went away.
fn read_tag<R: BufRead>(reader: &mut R) -> Result<u8> {
    let mut tag = [0u8; 1];
    reader.read_exact(&mut tag)?;
    Ok(tag[0])
}

fn read_text<R: BufRead>(reader: &mut R) -> Result<String> {
    let line = read_line(reader)?;
    Ok(String::from_utf8_lossy(&line).into_owned())
}

fn read_integer<R: BufRead>(reader: &mut R) -> Result<i64> {
    let line = read_text(reader)?;
    line.parse::<i64>().map_err(|_| Error::Parse(line))
}

/// Reads a length line. `-1` is the null sentinel and yields `None`.
fn read_length<R: BufRead>(reader: &mut R, what: &str) -> Result<Option<usize>> {
    match read_integer(reader)? {
        -1 => Ok(None),
        n if n < 0 => Err(Error::Protocol(format!("invalid {} length: {}", what, n))),
        n => usize::try_from(n)
            .map(Some)
            .map_err(|_| Error::Protocol(format!("invalid {} length: {}", what, n))),
    }
}

/// Reads exactly `len` payload bytes, then the two terminator bytes.
///
/// The buffer grows as bytes arrive, so a large declared length costs
/// nothing until the payload is actually sent. The terminator is consumed
/// without being checked.
fn read_bulk<R: BufRead>(reader: &mut R, len: usize) -> Result<Bytes> {
    let mut data = Vec::with_capacity(len.min(MAX_BULK_PREALLOC));
    reader.by_ref().take(len as u64).read_to_end(&mut data)?;
    if data.len() < len {
        return Err(Error::Connection(io::Error::from(
            io::ErrorKind::UnexpectedEof,
        )));
    }

    let mut terminator = [0u8; CRLF.len()];
    reader.read_exact(&mut terminator)?;

    Ok(Bytes::from(data))
}

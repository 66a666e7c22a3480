//! RESP (Redis Serialization Protocol) Reply Types
//!
//! This module defines the values a server can send back over RESP v2.
//!
//! ## Protocol Format
//!
//! Each reply starts with a type prefix byte:
//! - `+` Simple String
//! - `-` Error
//! - `:` Integer
//! - `$` Bulk String
//! - `*` Array
//!
//! All lines are terminated with CRLF (`\r\n`).
//!
//! ## Examples
//!
//! Simple String: `+OK\r\n`
//! Error: `-ERR unknown command\r\n`
//! Integer: `:1000\r\n`
//! Bulk String: `$5\r\nhello\r\n`
//! Array: `*2\r\n$3\r\nGET\r\n$4\r\nname\r\n`
//! Null Bulk String: `$-1\r\n`
//! Null Array: `*-1\r\n`

use crate::error::{Error, Result};
use bytes::Bytes;
use std::fmt;

/// The CRLF terminator used in RESP protocol
pub const CRLF: &[u8] = b"\r\n";

/// RESP protocol type prefixes
pub mod prefix {
    pub const SIMPLE_STRING: u8 = b'+';
    pub const ERROR: u8 = b'-';
    pub const INTEGER: u8 = b':';
    pub const BULK_STRING: u8 = b'$';
    pub const ARRAY: u8 = b'*';
}

/// A decoded server reply.
///
/// `T` is the type of bulk string leaves. Without a decode function it is
/// [`Bytes`]; with one it is whatever the function returns, applied to every
/// bulk string in the reply including those nested in arrays.
///
/// The null sentinels are their own variants: `NullBulk` never equals an
/// empty `BulkString`, and `NullArray` never equals an empty `Array`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply<T = Bytes> {
    /// Status reply.
    /// Format: `+<string>\r\n`
    SimpleString(String),

    /// Error reply sent by the server.
    /// Format: `-<error message>\r\n`
    Error(String),

    /// 64-bit signed integers.
    /// Format: `:<integer>\r\n`
    Integer(i64),

    /// Binary-safe string, possibly transformed by a decode function.
    /// Format: `$<length>\r\n<data>\r\n`
    BulkString(T),

    /// Null bulk string: `$-1\r\n`
    NullBulk,

    /// Arrays can contain any reply type, including nested arrays.
    /// Format: `*<count>\r\n<element1><element2>...`
    Array(Vec<Reply<T>>),

    /// Null array: `*-1\r\n`
    NullArray,
}

impl<T> Reply<T> {
    /// Returns true for either null sentinel.
    pub fn is_null(&self) -> bool {
        matches!(self, Reply::NullBulk | Reply::NullArray)
    }

    /// Returns true if the server answered with an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }

    /// Turns a server error reply into [`Error::Server`].
    ///
    /// Only the top-level reply is inspected; error replies nested in an
    /// array (as produced by `EXEC`) are left in place.
    ///
    /// # Example
    /// ```
    /// use resp_client::protocol::Reply;
    /// let reply: Reply = Reply::Error("ERR unknown command".into());
    /// assert!(reply.into_result().is_err());
    /// ```
    pub fn into_result(self) -> Result<Self> {
        match self {
            Reply::Error(message) => Err(Error::Server(message)),
            other => Ok(other),
        }
    }

    /// Attempts to extract the inner integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Reply::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract the inner bulk value.
    pub fn as_bulk(&self) -> Option<&T> {
        match self {
            Reply::BulkString(value) => Some(value),
            _ => None,
        }
    }

    /// Attempts to extract the inner array.
    pub fn as_array(&self) -> Option<&[Reply<T>]> {
        match self {
            Reply::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Consumes self and returns the inner array if this is an Array variant.
    pub fn into_array(self) -> Option<Vec<Reply<T>>> {
        match self {
            Reply::Array(arr) => Some(arr),
            _ => None,
        }
    }
}

impl<T: AsRef<[u8]>> Reply<T> {
    /// Attempts to view a SimpleString or a UTF-8 BulkString as text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Reply::SimpleString(s) => Some(s),
            Reply::BulkString(b) => std::str::from_utf8(b.as_ref()).ok(),
            _ => None,
        }
    }
}

/// Server-side wire encoding, for scripted test servers only.
#[cfg(test)]
impl<T: AsRef<[u8]>> Reply<T> {
    pub(crate) fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.serialize_into(&mut buf);
        buf
    }

    pub(crate) fn serialize_into(&self, buf: &mut Vec<u8>) {
        match self {
            Reply::SimpleString(s) => {
                buf.push(prefix::SIMPLE_STRING);
                buf.extend_from_slice(s.as_bytes());
                buf.extend_from_slice(CRLF);
            }
            Reply::Error(s) => {
                buf.push(prefix::ERROR);
                buf.extend_from_slice(s.as_bytes());
                buf.extend_from_slice(CRLF);
            }
            Reply::Integer(n) => {
                buf.push(prefix::INTEGER);
                buf.extend_from_slice(n.to_string().as_bytes());
                buf.extend_from_slice(CRLF);
            }
            Reply::BulkString(data) => {
                let data = data.as_ref();
                buf.push(prefix::BULK_STRING);
                buf.extend_from_slice(data.len().to_string().as_bytes());
                buf.extend_from_slice(CRLF);
                buf.extend_from_slice(data);
                buf.extend_from_slice(CRLF);
            }
            Reply::NullBulk => {
                buf.push(prefix::BULK_STRING);
                buf.extend_from_slice(b"-1");
                buf.extend_from_slice(CRLF);
            }
            Reply::Array(values) => {
                buf.push(prefix::ARRAY);
                buf.extend_from_slice(values.len().to_string().as_bytes());
                buf.extend_from_slice(CRLF);
                for value in values {
                    value.serialize_into(buf);
                }
            }
            Reply::NullArray => {
                buf.push(prefix::ARRAY);
                buf.extend_from_slice(b"-1");
                buf.extend_from_slice(CRLF);
            }
        }
    }
}

impl<T: AsRef<[u8]>> fmt::Display for Reply<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::SimpleString(s) => write!(f, "{}", s),
            Reply::Error(s) => write!(f, "(error) {}", s),
            Reply::Integer(n) => write!(f, "(integer) {}", n),
            Reply::BulkString(data) => {
                let data = data.as_ref();
                if let Ok(s) = std::str::from_utf8(data) {
                    write!(f, "\"{}\"", s)
                } else {
                    write!(f, "(binary data, {} bytes)", data.len())
                }
            }
            Reply::NullBulk | Reply::NullArray => write!(f, "(nil)"),
            Reply::Array(values) => {
                if values.is_empty() {
                    write!(f, "(empty array)")
                } else {
                    for (i, v) in values.iter().enumerate() {
                        if i > 0 {
                            writeln!(f)?;
                        }
                        write!(f, "{}) {}", i + 1, v)?;
                    }
                    Ok(())
                }
            }
        }
    }
}

//! Command Encoder
//!
//! Builds request frames. Two encodings coexist:
//!
//! - **Inline**: `PING\r\n`. The text is sent verbatim, so it must not
//!   contain CR or LF and sub-arguments must already be joined with spaces.
//!   Not binary-safe.
//! - **Array of bulk strings**: `*2\r\n$3\r\nGET\r\n$4\r\nname\r\n`. Every part
//!   is prefixed with its byte length, so names and arguments may hold
//!   arbitrary bytes, including `\0`, `\r` and `\n`.

use crate::protocol::types::{prefix, CRLF};
use bytes::{BufMut, Bytes, BytesMut};

/// An encoded request, ready to be written to the socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame(Bytes);

impl Frame {
    /// Encodes an inline command.
    ///
    /// # Example
    /// ```
    /// use resp_client::protocol::Frame;
    /// assert_eq!(Frame::inline("INFO all").as_bytes(), b"INFO all\r\n");
    /// ```
    pub fn inline(command: &str) -> Self {
        let mut buf = BytesMut::with_capacity(command.len() + CRLF.len());
        buf.put_slice(command.as_bytes());
        buf.put_slice(CRLF);
        Frame(buf.freeze())
    }

    /// Encodes a binary-safe command as an array of bulk strings. The name is
    /// length-prefixed like the arguments, so it may hold arbitrary bytes too.
    ///
    /// # Example
    /// ```
    /// use resp_client::protocol::Frame;
    /// let frame = Frame::command("GET", &["name"]);
    /// assert_eq!(frame.as_bytes(), b"*2\r\n$3\r\nGET\r\n$4\r\nname\r\n");
    /// ```
    pub fn command<N, A>(name: N, args: &[A]) -> Self
    where
        N: AsRef<[u8]>,
        A: AsRef<[u8]>,
    {
        let name = name.as_ref();
        let payload: usize = args.iter().map(|a| a.as_ref().len() + 16).sum();
        let mut buf = BytesMut::with_capacity(name.len() + payload + 32);

        put_header(&mut buf, prefix::ARRAY, args.len() + 1);
        put_bulk(&mut buf, name);
        for arg in args {
            put_bulk(&mut buf, arg.as_ref());
        }

        Frame(buf.freeze())
    }

    /// Returns the encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

/// Joins frames into one contiguous payload, preserving order.
pub fn concat<'a, I>(frames: I) -> Bytes
where
    I: IntoIterator<Item = &'a Frame>,
{
    let mut buf = BytesMut::new();
    for frame in frames {
        buf.put_slice(frame.as_bytes());
    }
    buf.freeze()
}

/// Writes `<prefix><n>\r\n`.
fn put_header(buf: &mut BytesMut, tag: u8, n: usize) {
    buf.put_u8(tag);
    buf.put_slice(n.to_string().as_bytes());
    buf.put_slice(CRLF);
}

/// Writes `$<len>\r\n<data>\r\n`.
fn put_bulk(buf: &mut BytesMut, data: &[u8]) {
    put_header(buf, prefix::BULK_STRING, data.len());
    buf.put_slice(data);
    buf.put_slice(CRLF);
}

//! Line Scanner
//!
//! Reads one CRLF-terminated line from a byte stream. Every text or length
//! field of a reply goes through [`read_line`].
//!
//! ## Carriage Return Runs
//!
//! The scanner does not simply stop at the first `\r\n`. A `\r` is held back
//! until the next byte decides what it was:
//!
//! ```text
//! "OK\r\n"      -> "OK"
//! "\r\r\n"      -> "\r"        (held CR flushed by the second CR)
//! "a\r\r\rb\r\n" -> "a\r\rb"
//! "a\rb\r\n"    -> "ab"        (a lone CR before an ordinary byte is dropped)
//! ```
//!
//! Existing servers and callers are expected to rely on this exact output,
//! so it must be kept as is.

use std::io::{self, Read};

const CR: u8 = b'\r';
const LF: u8 = b'\n';

/// Reads bytes until a CRLF terminator and returns the line without it.
///
/// End of stream before a terminator returns whatever was accumulated, which
/// may be empty.
pub fn read_line<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut line = Vec::new();
    let mut prev: Option<u8> = None;

    for byte in reader.bytes() {
        let byte = byte?;
        match (prev, byte) {
            (Some(CR), LF) => break,
            // Flush the held CR; the current one becomes the new pending CR
            (Some(CR), CR) => line.push(CR),
            (_, CR) => prev = Some(CR),
            _ => {
                line.push(byte);
                prev = Some(byte);
            }
        }
    }

    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    fn scan(input: &[u8]) -> Vec<u8> {
        read_line(&mut Cursor::new(input)).unwrap()
    }

    #[test]
    fn test_plain_line() {
        assert_eq!(scan(b"OK\r\n"), b"OK");
    }

    #[test]
    fn test_stops_at_first_terminator() {
        let mut cursor = Cursor::new(&b"first\r\nsecond\r\n"[..]);
        assert_eq!(read_line(&mut cursor).unwrap(), b"first");
        assert_eq!(read_line(&mut cursor).unwrap(), b"second");
        assert_eq!(read_line(&mut cursor).unwrap(), b"");
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(scan(b"\r\n"), b"");
    }

    #[test]
    fn test_bare_lf_is_content() {
        assert_eq!(scan(b"a\nb\r\n"), b"a\nb");
    }

    #[test]
    fn test_carriage_return_runs() {
        assert_eq!(scan(b"\r\r\n"), b"\r");
        assert_eq!(scan(b"a\r\r\rb\r\n"), b"a\r\rb");
        assert_eq!(scan(b"x\r\r\r\r\n"), b"x\r\r\r");
    }

    #[test]
    fn test_lone_carriage_return_is_dropped() {
        assert_eq!(scan(b"a\rb\r\n"), b"ab");
    }

    #[test]
    fn test_end_of_stream_returns_partial() {
        assert_eq!(scan(b"partial"), b"partial");
        assert_eq!(scan(b"held\r"), b"held");
        assert_eq!(scan(b""), b"");
    }

    #[test]
    fn test_terminator_split_across_reads() {
        // Capacity 1 forces every byte through a separate fill
        let mut reader = BufReader::with_capacity(1, Cursor::new(&b"PONG\r\n+"[..]));
        assert_eq!(read_line(&mut reader).unwrap(), b"PONG");

        let mut rest = Vec::new();
        reader.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"+");
    }
}

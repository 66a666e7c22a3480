//! Ready-made bulk string decode functions.
//!
//! Any `Fn(Bytes) -> T` works as a decode function; these cover the common
//! cases.

use bytes::Bytes;

/// Keeps the payload as raw bytes.
pub fn raw(bytes: Bytes) -> Bytes {
    bytes
}

/// Decodes the payload as UTF-8, replacing invalid sequences.
pub fn utf8_lossy(bytes: Bytes) -> String {
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Decodes the payload as UTF-8, keeping the raw bytes when it is not valid.
pub fn utf8(bytes: Bytes) -> Result<String, Bytes> {
    match String::from_utf8(bytes.to_vec()) {
        Ok(text) => Ok(text),
        Err(_) => Err(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_lossy() {
        assert_eq!(utf8_lossy(Bytes::from("héllo")), "héllo");
        assert_eq!(utf8_lossy(Bytes::from_static(b"a\xffb")), "a\u{fffd}b");
    }

    #[test]
    fn test_utf8_keeps_invalid_bytes() {
        assert_eq!(utf8(Bytes::from("ok")), Ok("ok".to_string()));
        assert_eq!(
            utf8(Bytes::from_static(b"\xff")),
            Err(Bytes::from_static(b"\xff"))
        );
    }
}

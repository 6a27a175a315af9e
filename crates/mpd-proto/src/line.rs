//! Line-based codec for tokio.
//!
//! Reads newline-terminated request lines as strict UTF-8 and writes response
//! lines with a single `\n` appended.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{ProtocolError, Result};
use crate::LINE_TERMINATOR;

/// Default maximum request length in bytes, terminator included.
pub const DEFAULT_MAX_LEN: usize = 8192;

/// Line-based codec that handles newline-terminated requests.
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
}

impl LineCodec {
    /// Create a codec with the default line limit.
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LEN)
    }

    /// Create a codec with a custom line limit.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>> {
        let Some(offset) = src[self.next_index..]
            .iter()
            .position(|b| *b == LINE_TERMINATOR)
        else {
            // No complete line yet - remember where we stopped
            self.next_index = src.len();
            if src.len() > self.max_len {
                return Err(ProtocolError::LineTooLong {
                    actual: src.len(),
                    limit: self.max_len,
                });
            }
            return Ok(None);
        };

        let line = src.split_to(self.next_index + offset + 1);
        self.next_index = 0;

        if line.len() > self.max_len {
            return Err(ProtocolError::LineTooLong {
                actual: line.len(),
                limit: self.max_len,
            });
        }

        let mut body = &line[..line.len() - 1];
        if body.last() == Some(&b'\r') {
            body = &body[..body.len() - 1];
        }

        match std::str::from_utf8(body) {
            Ok(text) => Ok(Some(text.to_owned())),
            Err(e) => Err(ProtocolError::InvalidUtf8 {
                raw_line: line.to_vec(),
                byte_pos: e.valid_up_to(),
                details: e.to_string(),
            }),
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> Result<()> {
        dst.reserve(line.len() + 1);
        dst.extend_from_slice(line.as_bytes());
        dst.extend_from_slice(&[LINE_TERMINATOR]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_complete_line() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("status\n");

        let result = codec.decode(&mut buf).unwrap();
        assert_eq!(result, Some("status".to_string()));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_strips_carriage_return() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("ping\r\n");

        assert_eq!(codec.decode(&mut buf).unwrap(), Some("ping".to_string()));
    }

    #[test]
    fn test_decode_partial_line() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("playlist");

        assert_eq!(codec.decode(&mut buf).unwrap(), None);

        buf.extend_from_slice(b"info\nping\n");
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some("playlistinfo".to_string())
        );
        assert_eq!(codec.decode(&mut buf).unwrap(), Some("ping".to_string()));
    }

    #[test]
    fn test_decode_too_long() {
        let mut codec = LineCodec::with_max_len(10);
        let mut buf = BytesMut::from("this is way too long\n");

        let result = codec.decode(&mut buf);
        assert!(matches!(result, Err(ProtocolError::LineTooLong { .. })));
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"add \xff\xfe\n"[..]);

        match codec.decode(&mut buf) {
            Err(ProtocolError::InvalidUtf8 { byte_pos, .. }) => assert_eq!(byte_pos, 4),
            other => panic!("expected InvalidUtf8, got {other:?}"),
        }
    }

    #[test]
    fn test_encode() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();

        codec.encode("volume: 50".to_string(), &mut buf).unwrap();
        codec.encode("OK".to_string(), &mut buf).unwrap();
        assert_eq!(&buf[..], b"volume: 50\nOK\n");
    }
}

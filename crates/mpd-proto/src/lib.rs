//! # mpd-proto
//!
//! Building blocks for speaking the Music Player Daemon text protocol.
//!
//! ## Features
//!
//! - Request tokenizing with MPD-compatible quoting and error messages
//! - Typed argument converters (integers, floats, booleans, ranges)
//! - `ACK` error line formatting with the protocol's numeric codes
//! - Result values rendered as `key: value` lines
//! - Optional Tokio line codec (strict UTF-8, newline terminated)
//!
//! ## Quick Start
//!
//! ```rust
//! use mpd_proto::{convert, tokenize};
//!
//! let tokens = tokenize::split(r#"playlistinfo "3:7""#).unwrap();
//! assert_eq!(tokens, vec!["playlistinfo", "3:7"]);
//!
//! let range = convert::range(&tokens[1]).unwrap();
//! assert_eq!(range.resolve(5), 3..5);
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod ack;
pub mod convert;
pub mod error;
#[cfg(feature = "tokio")]
pub mod line;
pub mod response;
pub mod tokenize;

pub use ack::{AckCode, AckLine};
pub use convert::{ConvertError, ListRange};
pub use error::ProtocolError;
#[cfg(feature = "tokio")]
pub use line::LineCodec;
pub use response::{Entry, Fields, FieldsBuilder, Reply};
pub use tokenize::TokenizeError;

/// The protocol is UTF-8 end to end.
pub const ENCODING: &str = "utf-8";

/// Requests and responses are terminated by a single newline byte.
pub const LINE_TERMINATOR: u8 = b'\n';

/// Protocol version announced in the greeting.
pub const VERSION: &str = "0.19.0";

/// Success marker closing every non-failing response.
pub const OK: &str = "OK";

/// Boundary marker emitted between members of a verbose command list.
pub const LIST_OK: &str = "list_OK";

/// The line sent to a client as soon as it connects.
pub fn greeting() -> String {
    format!("OK MPD {VERSION}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting() {
        assert_eq!(greeting(), "OK MPD 0.19.0");
    }
}

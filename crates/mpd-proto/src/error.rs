//! Framing errors for the protocol transport.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Errors raised while turning bytes into request lines.
///
/// Every variant is fatal for the connection: once the byte stream is
/// corrupt there is no clean way to resynchronise on the next request.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid UTF-8 bytes in a request line.
    #[error("invalid UTF-8 in request at byte {byte_pos}: {details}")]
    InvalidUtf8 {
        /// The raw line as received.
        raw_line: Vec<u8>,
        /// Byte position where UTF-8 validation failed.
        byte_pos: usize,
        /// Detailed error message from the UTF-8 decoder.
        details: String,
    },

    /// Line exceeded the configured maximum length.
    #[error("request too long: {actual} bytes (limit {limit})")]
    LineTooLong {
        /// Length seen so far.
        actual: usize,
        /// Configured maximum.
        limit: usize,
    },
}

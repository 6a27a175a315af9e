//! `ACK` error lines.
//!
//! Every failed request is answered with exactly one line:
//!
//! ```text
//! ACK [<code>@<list index>] {<command>} <message>
//! ```

use std::fmt;

/// Numeric error codes carried in `ACK` lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum AckCode {
    /// Generic failure with no better code.
    Generic = 0,
    /// Misuse of command lists.
    NotList = 1,
    /// Bad arguments or wrong arity.
    Arg = 2,
    /// Wrong password.
    Password = 3,
    /// Authorization required.
    Permission = 4,
    /// Unknown command or unparseable request.
    Unknown = 5,
    /// Referenced entity does not exist.
    NoExist = 50,
    /// Playlist is full.
    PlaylistMax = 51,
    /// Server-side failure.
    System = 52,
    /// Playlist could not be loaded.
    PlaylistLoad = 53,
    /// A database update is already running.
    UpdateAlready = 54,
    /// Player is not in sync.
    PlayerSync = 55,
    /// Entity already exists.
    Exist = 56,
}

impl AckCode {
    /// The numeric value written on the wire.
    pub fn code(self) -> u16 {
        self as u16
    }
}

/// A formatted `ACK` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AckLine<'a> {
    /// Error code.
    pub code: AckCode,
    /// Position inside the current command list, 0 outside a list.
    pub index: usize,
    /// Name of the failing command, empty if it could not be determined.
    pub command: &'a str,
    /// Human-readable message.
    pub message: &'a str,
}

impl fmt::Display for AckLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ACK [{}@{}] {{{}}} {}",
            self.code.code(),
            self.index,
            self.command,
            self.message
        )
    }
}

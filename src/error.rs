//! Unified error handling for mpdd.
//!
//! Per-request failures are `HandlerError`s; they end the current request (or
//! the rest of a command list) and are reported as one `ACK` line. Startup
//! failures (`RegistryError`, `ConfigError`) abort the process.

use mpd_proto::{AckCode, AckLine, ConvertError, TokenizeError};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors that can occur while processing one request.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("No command given")]
    NoCommand,

    #[error("unknown command \"{0}\"")]
    UnknownCommand(String),

    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    #[error("wrong number of arguments for \"{0}\"")]
    WrongArgCount(&'static str),

    /// A converter rejected the token bound to `param`.
    #[error("incorrect arguments")]
    Conversion {
        param: &'static str,
        #[source]
        source: ConvertError,
    },

    #[error("{0}")]
    Arg(String),

    #[error("incorrect password")]
    Password,

    #[error("you don't have permission for \"{0}\"")]
    Permission(String),

    #[error("{0}")]
    NotList(String),

    #[error("\"{0}\" has been disabled in the server")]
    Disabled(String),

    #[error("{0}")]
    System(String),

    #[error("Not implemented")]
    NotImplemented,
}

impl HandlerError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoCommand => "no_command",
            Self::UnknownCommand(_) => "unknown_command",
            Self::Tokenize(_) => "tokenize",
            Self::WrongArgCount(_) => "wrong_arg_count",
            Self::Conversion { .. } => "conversion",
            Self::Arg(_) => "argument",
            Self::Password => "password",
            Self::Permission(_) => "permission",
            Self::NotList(_) => "not_list",
            Self::Disabled(_) => "disabled",
            Self::System(_) => "system",
            Self::NotImplemented => "not_implemented",
        }
    }

    /// The numeric code written in the `ACK` line.
    pub fn ack_code(&self) -> AckCode {
        match self {
            Self::NoCommand | Self::UnknownCommand(_) => AckCode::Unknown,
            Self::Tokenize(e) => e.ack_code(),
            Self::WrongArgCount(_) | Self::Conversion { .. } | Self::Arg(_) => AckCode::Arg,
            Self::Password => AckCode::Password,
            Self::Permission(_) => AckCode::Permission,
            Self::NotList(_) => AckCode::NotList,
            Self::Disabled(_) | Self::System(_) => AckCode::System,
            Self::NotImplemented => AckCode::Generic,
        }
    }

    /// Attach the command name this failure is reported against.
    ///
    /// Unknown-command failures always report an empty command name; the
    /// name is already part of the message.
    pub fn ack(self, command: &str) -> Ack {
        let command = match self {
            Self::NoCommand | Self::UnknownCommand(_) => String::new(),
            _ => command.to_owned(),
        };
        Ack {
            error: self,
            command,
            index: 0,
        }
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<mpd_proto::Reply, HandlerError>;

/// A failure ready to be written as an `ACK` line.
#[derive(Debug)]
pub struct Ack {
    pub error: HandlerError,
    pub command: String,
    /// Position inside the running command list, 0 outside a list.
    pub index: usize,
}

impl Ack {
    pub fn at(mut self, index: usize) -> Self {
        self.index = index;
        self
    }
}

impl fmt::Display for Ack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.error.to_string();
        let line = AckLine {
            code: self.error.ack_code(),
            index: self.index,
            command: &self.command,
            message: &message,
        };
        write!(f, "{line}")
    }
}

// ============================================================================
// Registry Errors (startup)
// ============================================================================

/// A command descriptor that cannot be registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("command name must not be empty")]
    EmptyName,

    #[error("{0} already registered")]
    Duplicate(&'static str),

    #[error("{0}: no handler given")]
    MissingHandler(&'static str),

    #[error("{0}: variadic arguments may not be combined with named parameters")]
    VariadicWithParams(&'static str),

    #[error("{command}: parameter {param} declared twice")]
    DuplicateParam {
        command: &'static str,
        param: &'static str,
    },

    #[error("{command}: required parameter {param} follows an optional one")]
    RequiredAfterOptional {
        command: &'static str,
        param: &'static str,
    },

    #[error("{command}: converter given for non-existent parameter {param}")]
    UnknownParam {
        command: &'static str,
        param: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error_codes() {
        assert_eq!(HandlerError::NoCommand.error_code(), "no_command");
        assert_eq!(HandlerError::Password.error_code(), "password");
        assert_eq!(HandlerError::System("x".into()).error_code(), "system");
    }

    #[test]
    fn test_unknown_command_ack() {
        let ack = HandlerError::UnknownCommand("foo".into()).ack("foo");
        assert_eq!(ack.to_string(), r#"ACK [5@0] {} unknown command "foo""#);
    }

    #[test]
    fn test_no_command_ack() {
        let ack = HandlerError::NoCommand.ack("");
        assert_eq!(ack.to_string(), "ACK [5@0] {} No command given");
    }

    #[test]
    fn test_argument_ack_in_list() {
        let ack = HandlerError::WrongArgCount("setvol").ack("setvol").at(2);
        assert_eq!(
            ack.to_string(),
            r#"ACK [2@2] {setvol} wrong number of arguments for "setvol""#
        );
    }

    #[test]
    fn test_permission_ack() {
        let ack = HandlerError::Permission("status".into()).ack("status");
        assert_eq!(
            ack.to_string(),
            r#"ACK [4@0] {status} you don't have permission for "status""#
        );
    }

    #[test]
    fn test_tokenize_ack() {
        let ack = HandlerError::from(TokenizeError::MissingClosingQuote).ack("add");
        assert_eq!(ack.to_string(), r#"ACK [2@0] {add} Missing closing '"'"#);
    }

    #[test]
    fn test_disabled_ack() {
        let ack = HandlerError::Disabled("listall".into()).ack("listall");
        assert_eq!(
            ack.to_string(),
            r#"ACK [52@0] {listall} "listall" has been disabled in the server"#
        );
    }
}

//! Request tokenizer.
//!
//! A request is a lowercase command word followed by arguments. Arguments are
//! either bare words (no whitespace, quotes or backslashes) or double-quoted
//! strings in which a backslash escapes the following character. Error
//! messages match what stock MPD reports so clients see familiar text.

use crate::ack::AckCode;
use thiserror::Error;

/// Why a request line could not be split.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// Blank request.
    #[error("No command given")]
    NoCommand,

    /// Whitespace before the command word.
    #[error("Letter expected")]
    LetterExpected,

    /// The command word contains characters outside `[a-z0-9_]`.
    #[error("Invalid word character")]
    InvalidWordCharacter,

    /// A quoted argument never closes.
    #[error("Missing closing '\"'")]
    MissingClosingQuote,

    /// A quoted argument is glued to the next token.
    #[error("Space expected after closing '\"'")]
    SpaceExpected,

    /// A bare argument contains a quote or backslash.
    #[error("Invalid unquoted character")]
    InvalidUnquotedCharacter,
}

impl TokenizeError {
    /// ACK code reported for this failure.
    pub fn ack_code(&self) -> AckCode {
        match self {
            Self::NoCommand | Self::LetterExpected | Self::InvalidWordCharacter => AckCode::Unknown,
            Self::MissingClosingQuote | Self::SpaceExpected | Self::InvalidUnquotedCharacter => {
                AckCode::Arg
            }
        }
    }
}

/// Split a request line into tokens. The first token is the command name.
pub fn split(line: &str) -> Result<Vec<String>, TokenizeError> {
    if line.trim().is_empty() {
        return Err(TokenizeError::NoCommand);
    }

    let trimmed = line.trim_start();
    let had_leading_space = trimmed.len() != line.len();

    let (command, mut rest) = command_word(trimmed).ok_or(TokenizeError::InvalidWordCharacter)?;
    if had_leading_space {
        return Err(TokenizeError::LetterExpected);
    }

    let mut tokens = vec![command.to_owned()];
    while !rest.is_empty() {
        let (token, remainder) = if rest.starts_with('"') {
            quoted(rest)?
        } else {
            unquoted(rest)?
        };
        tokens.push(token);
        rest = remainder;
    }
    Ok(tokens)
}

/// `[a-z][a-z0-9_]*` followed by whitespace or end of input.
fn command_word(s: &str) -> Option<(&str, &str)> {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_lowercase() => {}
        _ => return None,
    }
    let end = chars
        .find(|(_, c)| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_'))
        .map_or(s.len(), |(i, _)| i);
    let (word, after) = s.split_at(end);
    separated(after).map(|rest| (word, rest))
}

/// Require whitespace (or nothing) and skip it.
fn separated(after: &str) -> Option<&str> {
    match after.chars().next() {
        None => Some(after),
        Some(c) if c.is_whitespace() => Some(after.trim_start()),
        Some(_) => None,
    }
}

fn quoted(s: &str) -> Result<(String, &str), TokenizeError> {
    let mut value = String::new();
    let mut chars = s.char_indices().skip(1);
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, escaped)) => value.push(escaped),
                None => break,
            },
            '"' => {
                let after = &s[i + 1..];
                return separated(after)
                    .map(|rest| (value, rest))
                    .ok_or(TokenizeError::SpaceExpected);
            }
            _ => value.push(c),
        }
    }
    Err(TokenizeError::MissingClosingQuote)
}

fn unquoted(s: &str) -> Result<(String, &str), TokenizeError> {
    let end = s
        .find(|c: char| c.is_whitespace() || c == '"' || c == '\\')
        .unwrap_or(s.len());
    let (word, after) = s.split_at(end);
    if word.is_empty() {
        return Err(TokenizeError::InvalidUnquotedCharacter);
    }
    separated(after)
        .map(|rest| (word.to_owned(), rest))
        .ok_or(TokenizeError::InvalidUnquotedCharacter)
}

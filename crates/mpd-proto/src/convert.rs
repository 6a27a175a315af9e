//! Argument converters.
//!
//! Every request argument arrives as a string token. These functions turn a
//! token into the typed value a command expects and fail with a
//! [`ConvertError`] on anything else. They never panic.

use std::ops::Range;
use thiserror::Error;

/// A token that could not be converted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// Not of the form `[+-]?digits`.
    #[error("{0:?} is not a valid integer")]
    NotInteger(String),

    /// Signed, fractional or otherwise not plain digits.
    #[error("only positive numbers are allowed: {0:?}")]
    NotUnsigned(String),

    /// Not a decimal number.
    #[error("{0:?} is not a valid float")]
    NotFloat(String),

    /// Not exactly `0` or `1`.
    #[error("{0:?} is not 0 or 1")]
    NotBoolean(String),

    /// Range syntax is malformed.
    #[error("{0:?} is not a valid range")]
    InvalidRange(String),

    /// `N:M` with `M <= N`.
    #[error("end must be larger than start in {start}:{end}")]
    EmptyRange {
        /// Parsed start.
        start: u32,
        /// Parsed end.
        end: u32,
    },
}

/// A half-open position range as written by clients.
///
/// `end == None` means "up to the end of the collection", which only the
/// consumer can resolve because it knows the collection's length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListRange {
    /// First position, inclusive.
    pub start: u32,
    /// Last position, exclusive; `None` is open-ended.
    pub end: Option<u32>,
}

impl ListRange {
    /// A range covering exactly one position.
    pub fn single(pos: u32) -> Self {
        Self {
            start: pos,
            end: Some(pos.saturating_add(1)),
        }
    }

    /// Whether the upper bound was left open (`N:`).
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Clamp the range against a collection of `len` elements.
    ///
    /// The result is always a valid (possibly empty) slice range.
    pub fn resolve(&self, len: usize) -> Range<usize> {
        let start = (self.start as usize).min(len);
        let end = self.end.map_or(len, |end| (end as usize).min(len));
        start..end.max(start)
    }
}

impl std::fmt::Display for ListRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.end {
            Some(end) if end == self.start.saturating_add(1) => write!(f, "{}", self.start),
            Some(end) => write!(f, "{}:{}", self.start, end),
            None => write!(f, "{}:", self.start),
        }
    }
}

/// `[+-]?digits` into a signed integer.
pub fn integer(token: &str) -> Result<i64, ConvertError> {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConvertError::NotInteger(token.to_owned()));
    }
    token
        .parse()
        .map_err(|_| ConvertError::NotInteger(token.to_owned()))
}

/// `digits` into an unsigned integer.
pub fn unsigned_integer(token: &str) -> Result<u64, ConvertError> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConvertError::NotUnsigned(token.to_owned()));
    }
    token
        .parse()
        .map_err(|_| ConvertError::NotUnsigned(token.to_owned()))
}

/// `[+-]?digits[.digits]` into a float.
pub fn float(token: &str) -> Result<f64, ConvertError> {
    let body = token.strip_prefix(['+', '-']).unwrap_or(token);
    let (whole, frac) = body.split_once('.').unwrap_or((body, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if whole.len() + frac.len() == 0 || !all_digits(whole) || !all_digits(frac) {
        return Err(ConvertError::NotFloat(token.to_owned()));
    }
    token
        .parse()
        .map_err(|_| ConvertError::NotFloat(token.to_owned()))
}

/// Float syntax, rejecting negative values.
pub fn unsigned_float(token: &str) -> Result<f64, ConvertError> {
    let value = float(token)?;
    if value < 0.0 {
        return Err(ConvertError::NotUnsigned(token.to_owned()));
    }
    Ok(value)
}

/// Exactly `"0"` or `"1"`.
pub fn boolean(token: &str) -> Result<bool, ConvertError> {
    match token {
        "1" => Ok(true),
        "0" => Ok(false),
        _ => Err(ConvertError::NotBoolean(token.to_owned())),
    }
}

/// `N`, `N:` or `N:M` into a [`ListRange`].
pub fn range(token: &str) -> Result<ListRange, ConvertError> {
    let bound = |s: &str| {
        unsigned_integer(s)
            .ok()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| ConvertError::InvalidRange(token.to_owned()))
    };

    match token.split_once(':') {
        None => Ok(ListRange::single(bound(token)?)),
        Some((start, "")) => Ok(ListRange {
            start: bound(start)?,
            end: None,
        }),
        Some((start, end)) => {
            let (start, end) = (bound(start)?, bound(end)?);
            if end <= start {
                return Err(ConvertError::EmptyRange { start, end });
            }
            Ok(ListRange {
                start,
                end: Some(end),
            })
        }
    }
}

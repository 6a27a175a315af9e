//! Typed command arguments.
//!
//! Tokens arrive as strings. A command declares which of its parameters are
//! converted, and handlers read the bound values back through [`Args`].

use crate::error::HandlerError;
use mpd_proto::convert as conv;
use mpd_proto::{ConvertError, ListRange};

/// A bound argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Optional parameter left unset with no meaningful default.
    Absent,
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Range(ListRange),
}

/// Turns a raw token into a typed [`Value`].
pub type Converter = fn(&str) -> Result<Value, ConvertError>;

pub fn int(token: &str) -> Result<Value, ConvertError> {
    conv::integer(token).map(Value::Int)
}

pub fn uint(token: &str) -> Result<Value, ConvertError> {
    conv::unsigned_integer(token).map(Value::UInt)
}

pub fn float(token: &str) -> Result<Value, ConvertError> {
    conv::float(token).map(Value::Float)
}

pub fn ufloat(token: &str) -> Result<Value, ConvertError> {
    conv::unsigned_float(token).map(Value::Float)
}

pub fn boolean(token: &str) -> Result<Value, ConvertError> {
    conv::boolean(token).map(Value::Bool)
}

pub fn range(token: &str) -> Result<Value, ConvertError> {
    conv::range(token).map(Value::Range)
}

/// Arguments handed to a handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Args {
    /// Values bound to declared parameters, in declaration order.
    Named(Vec<(&'static str, Value)>),
    /// Raw tokens for variadic commands.
    Rest(Vec<String>),
}

impl Args {
    /// Look up a named parameter.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Named(values) => values.iter().find(|(n, _)| *n == name).map(|(_, v)| v),
            Self::Rest(_) => None,
        }
    }

    /// Bound values in declaration order, without names.
    pub fn values(&self) -> Vec<Value> {
        match self {
            Self::Named(values) => values.iter().map(|(_, v)| v.clone()).collect(),
            Self::Rest(tokens) => tokens.iter().cloned().map(Value::Str).collect(),
        }
    }

    /// Tokens passed to a variadic command.
    pub fn rest(&self) -> &[String] {
        match self {
            Self::Rest(tokens) => tokens,
            Self::Named(_) => &[],
        }
    }

    pub fn str(&self, name: &'static str) -> Result<&str, HandlerError> {
        match self.get(name) {
            Some(Value::Str(s)) => Ok(s),
            other => Err(mismatch(name, other)),
        }
    }
}

// A handler asked for a type its descriptor never produces.
fn mismatch(name: &str, found: Option<&Value>) -> HandlerError {
    HandlerError::System(format!("argument {name} has unexpected value {found:?}"))
}

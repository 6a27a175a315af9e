//! Command results and their `key: value` rendering.

use std::fmt::Display;

/// An ordered block of fields. Keys may repeat.
pub type Fields = Vec<(String, String)>;

/// One element of a [`Reply::List`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A single `key: value` line.
    Pair(String, String),
    /// A block of lines, e.g. one track.
    Fields(Fields),
}

/// The outcome of a successful command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Reply {
    /// Nothing besides the trailing `OK`.
    #[default]
    Empty,
    /// A single `key: value` line.
    Pair(String, String),
    /// An ordered block of `key: value` lines.
    Fields(Fields),
    /// A sequence of lines and blocks, for results with repeated keys.
    List(Vec<Entry>),
}

impl Reply {
    /// Build a single-pair reply.
    pub fn pair(key: impl Into<String>, value: impl Display) -> Self {
        Self::Pair(key.into(), value.to_string())
    }

    /// Whether rendering this reply yields no lines.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Pair(..) => false,
            Self::Fields(fields) => fields.is_empty(),
            Self::List(entries) => entries.iter().all(|entry| match entry {
                Entry::Pair(..) => false,
                Entry::Fields(fields) => fields.is_empty(),
            }),
        }
    }

    /// Render to protocol lines, without the trailing `OK`.
    pub fn into_lines(self) -> Vec<String> {
        match self {
            Self::Empty => Vec::new(),
            Self::Pair(key, value) => vec![line(&key, &value)],
            Self::Fields(fields) => render(fields),
            Self::List(entries) => entries
                .into_iter()
                .flat_map(|entry| match entry {
                    Entry::Pair(key, value) => vec![line(&key, &value)],
                    Entry::Fields(fields) => render(fields),
                })
                .collect(),
        }
    }
}

/// Accumulates `key: value` pairs into a [`Fields`] block.
#[derive(Debug, Default)]
pub struct FieldsBuilder {
    fields: Fields,
}

impl FieldsBuilder {
    /// Start an empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field.
    pub fn field(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.fields.push((key.into(), value.to_string()));
        self
    }

    /// Append a field only when a value is present.
    pub fn field_opt<V: Display>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.field(key, value),
            None => self,
        }
    }

    /// Finish the block.
    pub fn build(self) -> Fields {
        self.fields
    }
}

fn line(key: &str, value: &str) -> String {
    format!("{key}: {value}")
}

fn render(fields: Fields) -> Vec<String> {
    fields.iter().map(|(k, v)| line(k, v)).collect()
}

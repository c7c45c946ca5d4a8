use std::fmt;

use indexmap::IndexMap;
use sylva_ir::Value;

/// Output of generating one value.
///
/// Nodes and scalars produce text; containers keep their shape so render
/// rules can join or index the per-element results.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Generated {
    Text(String),
    Seq(Vec<Generated>),
    /// Per-element results of a set, in the set's iteration order.
    Set(Vec<Generated>),
    Map(IndexMap<Value, Generated>),
}

impl Generated {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Generated::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn items(&self) -> Option<&[Generated]> {
        match self {
            Generated::Seq(items) | Generated::Set(items) => Some(items),
            _ => None,
        }
    }

    /// Flatten to text, joining container elements with `sep`.
    ///
    /// Nested containers use `sep` at every level; map entries render as
    /// `key: value`.
    pub fn join(&self, sep: &str) -> String {
        match self {
            Generated::Text(text) => text.clone(),
            Generated::Seq(items) | Generated::Set(items) => {
                items.iter().map(|item| item.join(sep)).collect::<Vec<_>>().join(sep)
            }
            Generated::Map(entries) => entries
                .iter()
                .map(|(key, value)| format!("{}: {}", key_text(key), value.join(sep)))
                .collect::<Vec<_>>()
                .join(sep),
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Generated::Text(text) => text,
            other => other.to_string(),
        }
    }
}

fn key_text(key: &Value) -> String {
    match key {
        Value::Str(s) => s.clone(),
        other => other.to_string(),
    }
}

impl fmt::Display for Generated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(", "))
    }
}

impl From<String> for Generated {
    fn from(text: String) -> Self {
        Generated::Text(text)
    }
}

impl From<&str> for Generated {
    fn from(text: &str) -> Self {
        Generated::Text(text.to_owned())
    }
}

impl<T: Into<Generated>> From<Vec<T>> for Generated {
    fn from(items: Vec<T>) -> Self {
        Generated::Seq(items.into_iter().map(Into::into).collect())
    }
}

//! Provenance metadata carried by every spectrum.
//!
//! Metadata is an open, ordered mapping from string keys to [`MetaValue`]s. Parsers fill in
//! station/date/focus information, and every derived spectrum appends a record of the transform
//! that produced it to the [`HISTORY_KEY`] list, so the chain of crops, combines and noise
//! reductions stays auditable.

use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Ordered metadata mapping.
pub type Meta = BTreeMap<String, MetaValue>;

/// Key of the transform history list.
pub const HISTORY_KEY: &str = "history";

/// A dynamically-typed metadata value.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialization", serde(untagged))]
pub enum MetaValue {
    /// Missing value (e.g. a header field that could not be read).
    #[default]
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Integer value.
    Integer(i64),
    /// Floating point value.
    Float(f64),
    /// Free text.
    Text(String),
    /// Ordered list of values.
    List(Vec<MetaValue>),
    /// Nested mapping.
    Map(Meta),
}

impl MetaValue {
    /// Interpret the value as an `f64` if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetaValue::Float(v) => Some(*v),
            MetaValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Borrow the value as text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the value as a nested mapping.
    pub fn as_map(&self) -> Option<&Meta> {
        match self {
            MetaValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Borrow the value as a list.
    pub fn as_list(&self) -> Option<&[MetaValue]> {
        match self {
            MetaValue::List(l) => Some(l),
            _ => None,
        }
    }

    /// Whether the value is [`MetaValue::Null`].
    pub const fn is_null(&self) -> bool {
        matches!(self, MetaValue::Null)
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Null => write!(f, "<null>"),
            MetaValue::Bool(b) => write!(f, "{b}"),
            MetaValue::Integer(i) => write!(f, "{i}"),
            MetaValue::Float(v) => write!(f, "{v}"),
            MetaValue::Text(s) => write!(f, "{s}"),
            MetaValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            MetaValue::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for MetaValue {
    fn from(v: bool) -> Self {
        MetaValue::Bool(v)
    }
}

impl From<i64> for MetaValue {
    fn from(v: i64) -> Self {
        MetaValue::Integer(v)
    }
}

impl From<usize> for MetaValue {
    fn from(v: usize) -> Self {
        i64::try_from(v).map_or(MetaValue::Float(v as f64), MetaValue::Integer)
    }
}

impl From<f64> for MetaValue {
    fn from(v: f64) -> Self {
        MetaValue::Float(v)
    }
}

impl From<&str> for MetaValue {
    fn from(v: &str) -> Self {
        MetaValue::Text(v.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(v: String) -> Self {
        MetaValue::Text(v)
    }
}

impl From<Meta> for MetaValue {
    fn from(v: Meta) -> Self {
        MetaValue::Map(v)
    }
}

impl From<Vec<MetaValue>> for MetaValue {
    fn from(v: Vec<MetaValue>) -> Self {
        MetaValue::List(v)
    }
}

impl<T: Into<MetaValue>> From<Option<T>> for MetaValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(MetaValue::Null, Into::into)
    }
}

/// A record describing one applied transform: its method name plus parameters.
#[derive(Debug, Clone, Default)]
pub struct TransformRecord {
    entries: Meta,
}

impl TransformRecord {
    /// Start a record for `method`.
    pub fn new(method: &str) -> Self {
        let mut entries = Meta::new();
        entries.insert("method".to_string(), MetaValue::from(method));
        Self { entries }
    }

    /// Attach a parameter.
    pub fn param(mut self, key: &str, value: impl Into<MetaValue>) -> Self {
        self.entries.insert(key.to_string(), value.into());
        self
    }

    /// The record as a metadata mapping.
    pub fn into_meta(self) -> Meta {
        self.entries
    }
}

/// Returns a copy of `meta` with `record` appended to its history list.
///
/// A non-list value stored under [`HISTORY_KEY`] is kept as the first history entry rather than
/// discarded.
pub fn with_history(meta: &Meta, record: TransformRecord) -> Meta {
    let mut out = meta.clone();
    let entry = MetaValue::Map(record.into_meta());
    match out.remove(HISTORY_KEY) {
        Some(MetaValue::List(mut items)) => {
            items.push(entry);
            out.insert(HISTORY_KEY.to_string(), MetaValue::List(items));
        }
        Some(other) => {
            out.insert(HISTORY_KEY.to_string(), MetaValue::List(vec![other, entry]));
        }
        None => {
            out.insert(HISTORY_KEY.to_string(), MetaValue::List(vec![entry]));
        }
    }
    out
}

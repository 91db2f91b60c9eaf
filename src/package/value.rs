//! Loosely structured values handed over by a package parser.

use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Opaque value produced by a package parser.
///
/// Component descriptors and file listings are reproduced as they come. Converting them to
/// JSON only needs to know which of these shapes a value has.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Missing value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// Text.
    Text(String),
    /// Raw bytes, decoded as UTF-8 text on output.
    Bytes(Vec<u8>),
    /// Ordered sequence.
    Sequence(Vec<RawValue>),
    /// Key/value mapping. Keys are turned into strings on output.
    Mapping(Vec<(RawValue, RawValue)>),
    /// Anything else, through its string form.
    Other(String),
}

impl RawValue {
    /// Gets the text of the value, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Converts the value into JSON.
    ///
    /// Non finite floats have no JSON form and are written as their string form.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Integer(i) => Value::Number(Number::from(*i)),
            Self::Float(f) => {
                Number::from_f64(*f).map_or_else(|| Value::String(f.to_string()), Value::Number)
            }
            Self::Text(s) | Self::Other(s) => Value::String(s.clone()),
            Self::Bytes(b) => Value::String(decode_lossy(b)),
            Self::Sequence(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Mapping(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect::<Map<_, _>>(),
            ),
        }
    }
}

/// Decodes UTF-8, dropping invalid sequences.
fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .filter(|c| *c != char::REPLACEMENT_CHARACTER)
        .collect()
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Text(s) | Self::Other(s) => write!(f, "{}", s),
            Self::Bytes(b) => write!(f, "{}", decode_lossy(b)),
            Self::Sequence(_) | Self::Mapping(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl Serialize for RawValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

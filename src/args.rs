//! Argument value model shared by the schema table and the validator.
//!
//! User-supplied configuration reaches the core as an [`ArgumentMap`]: the
//! subset of CLI flags (or library kwargs) that were actually set, keyed by
//! parameter name. Values are dynamically typed ([`ArgValue`]) because each
//! quantization method accepts a different key set; the schema table pins
//! down what is legal per method.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A supplied argument value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArgValue {
    Str(String),
    Int(i64),
    Bool(bool),
    /// A list of strings (e.g. inline calibration samples).
    List(Vec<String>),
}

impl ArgValue {
    /// The type tag of this value, used for type-constraint checks.
    #[must_use]
    pub fn type_tag(&self) -> TypeTag {
        match self {
            ArgValue::Str(_) => TypeTag::Str,
            ArgValue::Int(_) => TypeTag::Int,
            ArgValue::Bool(_) => TypeTag::Bool,
            ArgValue::List(_) => TypeTag::StrList,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Str(s) => write!(f, "{s}"),
            ArgValue::Int(i) => write!(f, "{i}"),
            ArgValue::Bool(b) => write!(f, "{b}"),
            ArgValue::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::Str(s.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        ArgValue::Str(s)
    }
}

impl From<i64> for ArgValue {
    fn from(i: i64) -> Self {
        ArgValue::Int(i)
    }
}

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        ArgValue::Bool(b)
    }
}

/// Runtime type vocabulary for type constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TypeTag {
    #[serde(rename = "string")]
    Str,
    #[serde(rename = "integer")]
    Int,
    #[serde(rename = "boolean")]
    Bool,
    #[serde(rename = "list-of-string")]
    StrList,
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeTag::Str => "string",
            TypeTag::Int => "integer",
            TypeTag::Bool => "boolean",
            TypeTag::StrList => "list-of-string",
        };
        write!(f, "{name}")
    }
}

/// Supplied arguments for one quantization run, with unset entries already
/// stripped. Iteration order is deterministic (lexicographic by key), which
/// fixes the order in which violations are reported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentMap(BTreeMap<String, ArgValue>);

impl ArgumentMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ArgValue>) {
        self.0.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ArgValue)> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// String accessor; `None` if the key is absent or holds another type.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(ArgValue::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.0.get(key) {
            Some(ArgValue::Int(i)) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.0.get(key) {
            Some(ArgValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        match self.0.get(key) {
            Some(ArgValue::List(items)) => Some(items.as_slice()),
            _ => None,
        }
    }
}

impl<K: Into<String>, V: Into<ArgValue>> FromIterator<(K, V)> for ArgumentMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

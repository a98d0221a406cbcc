//! Analysis document tree.
//!
//! Provider responses are open-ended JSON. They are converted once into a
//! [`Node`] tree so the exporter can recurse over an explicit
//! scalar / sequence / mapping variant instead of untyped values.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// JSON null.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number, kept in its original JSON representation.
    Number(Number),
    /// A string.
    Text(String),
}

impl Scalar {
    /// Converts back into a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::Text(s) => Value::String(s.clone()),
        }
    }

    /// Returns the value as `f64` when it is numeric.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// A node in an analysis document.
///
/// Mapping entries keep the order in which the provider sent them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Node {
    /// A leaf value.
    Scalar(Scalar),
    /// An ordered sequence.
    Sequence(Vec<Node>),
    /// String keys to nodes.
    Mapping(Vec<(String, Node)>),
}

impl Node {
    /// Looks up a key in a mapping node.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Self::Mapping(entries) => entries
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Returns the elements if this is a sequence.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries if this is a mapping.
    #[must_use]
    pub fn as_mapping(&self) -> Option<&[(String, Node)]> {
        match self {
            Self::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Converts back into a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Scalar(s) => s.to_value(),
            Self::Sequence(items) => Value::Array(items.iter().map(Self::to_value).collect()),
            Self::Mapping(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_value()))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Scalar(Scalar::Null),
            Value::Bool(b) => Self::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Self::Scalar(Scalar::Number(n)),
            Value::String(s) => Self::Scalar(Scalar::Text(s)),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Mapping(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        node.to_value()
    }
}

/// The analysis result for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDocument {
    /// The URL that was analyzed.
    pub url: String,
    /// The provider's response body.
    pub root: Node,
}

impl AnalysisDocument {
    /// Creates a document from a parsed provider response.
    #[must_use]
    pub fn new(url: impl Into<String>, body: Value) -> Self {
        Self {
            url: url.into(),
            root: Node::from(body),
        }
    }

    /// Returns the top-level entries; empty unless the body is a mapping.
    #[must_use]
    pub fn top_level(&self) -> &[(String, Node)] {
        self.root.as_mapping().unwrap_or(&[])
    }

    /// Returns the sub-objects stored under `key`, if that key holds a sequence.
    #[must_use]
    pub fn collection(&self, key: &str) -> Option<&[Node]> {
        self.root.get(key).and_then(Node::as_sequence)
    }

    /// Converts the body back into JSON.
    #[must_use]
    pub fn to_value(&self) -> Value {
        self.root.to_value()
    }
}

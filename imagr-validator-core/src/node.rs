//! Generic configuration tree.
//!
//! The loader turns whatever serialization format it was handed into a
//! [`Node`] tree. The rule engine only ever reads this tree, and every
//! accessor is strict: a string is never read as a boolean, a number is
//! never read as a string.

use std::fmt;

use indexmap::IndexMap;

use crate::error::NodeError;

/// Insertion-ordered mapping of keys to child nodes.
pub type Mapping = IndexMap<String, Node>;

/// A parsed document value.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Key/value dictionary, document order preserved.
    Mapping(Mapping),
    /// Ordered array.
    Sequence(Vec<Node>),
    /// Text.
    String(String),
    /// Genuine boolean (`<true/>`, `<false/>`, `true`, `false`).
    Bool(bool),
    /// Integer or real.
    Number(f64),
    /// Opaque binary blob.
    Data(Vec<u8>),
    /// Explicit null / empty document.
    Null,
}

/// The variant of a [`Node`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// [`Node::Mapping`]
    Mapping,
    /// [`Node::Sequence`]
    Sequence,
    /// [`Node::String`]
    String,
    /// [`Node::Bool`]
    Bool,
    /// [`Node::Number`]
    Number,
    /// [`Node::Data`]
    Data,
    /// [`Node::Null`]
    Null,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mapping => "dictionary",
            Self::Sequence => "array",
            Self::String => "string",
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::Data => "data",
            Self::Null => "null",
        };
        f.write_str(name)
    }
}

impl Node {
    /// Returns the variant of this node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Mapping(_) => NodeKind::Mapping,
            Self::Sequence(_) => NodeKind::Sequence,
            Self::String(_) => NodeKind::String,
            Self::Bool(_) => NodeKind::Bool,
            Self::Number(_) => NodeKind::Number,
            Self::Data(_) => NodeKind::Data,
            Self::Null => NodeKind::Null,
        }
    }

    /// Looks up `key` in a mapping.
    ///
    /// Returns `None` both when the key is absent and when `self` is not a
    /// mapping.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    /// Returns `true` if `self` is a mapping containing `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Reads a string.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::WrongType`] for any other variant.
    pub fn as_str(&self) -> Result<&str, NodeError> {
        match self {
            Self::String(s) => Ok(s),
            other => Err(other.wrong_type(NodeKind::String)),
        }
    }

    /// Reads a boolean. Strings like `"true"` and numbers like `1` are
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::WrongType`] for any other variant.
    pub fn as_bool(&self) -> Result<bool, NodeError> {
        match self {
            Self::Bool(b) => Ok(*b),
            other => Err(other.wrong_type(NodeKind::Bool)),
        }
    }

    /// Reads a sequence.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::WrongType`] for any other variant.
    pub fn as_sequence(&self) -> Result<&[Self], NodeError> {
        match self {
            Self::Sequence(items) => Ok(items),
            other => Err(other.wrong_type(NodeKind::Sequence)),
        }
    }

    /// Reads a mapping.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::WrongType`] for any other variant.
    pub fn as_mapping(&self) -> Result<&Mapping, NodeError> {
        match self {
            Self::Mapping(map) => Ok(map),
            other => Err(other.wrong_type(NodeKind::Mapping)),
        }
    }

    /// `true` only for `Node::Bool(true)`.
    #[must_use]
    pub const fn is_true(&self) -> bool {
        matches!(self, Self::Bool(true))
    }

    /// Maximum nesting depth below this node. Scalars have depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Mapping(map) => 1 + map.values().map(Self::depth).max().unwrap_or(0),
            Self::Sequence(items) => 1 + items.iter().map(Self::depth).max().unwrap_or(0),
            _ => 0,
        }
    }

    const fn wrong_type(&self, expected: NodeKind) -> NodeError {
        NodeError::WrongType {
            expected,
            found: self.kind(),
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Node {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<Vec<Self>> for Node {
    fn from(value: Vec<Self>) -> Self {
        Self::Sequence(value)
    }
}

impl From<Mapping> for Node {
    fn from(value: Mapping) -> Self {
        Self::Mapping(value)
    }
}

impl<K: Into<String>> FromIterator<(K, Self)> for Node {
    fn from_iter<I: IntoIterator<Item = (K, Self)>>(iter: I) -> Self {
        Self::Mapping(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

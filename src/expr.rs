//! The expression tree type shared by the text and binary formats.
//!
//! An [`Expression`] is an owned tree: arrays and maps own their children, and
//! cloning one produces a fully independent deep copy. Exactly one variant is
//! active at a time; replacing a node means constructing a new variant value
//! and assigning it.

use std::fmt;

use crate::text::{self, WriteOptions};

/// One node of a Wexpr document.
///
/// Scalars carry their payload directly. `Value` holds text (Wexpr has no
/// numeric type at this layer, so `12` and `"12"` are both values), while
/// `BinaryData` holds raw bytes that appear as base64 in the text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// The absence of a value, spelled `null` or `nil` in text form.
    Null,
    /// A UTF-8 string scalar.
    Value(String),
    /// An ordered sequence of child expressions.
    Array(Vec<Expression>),
    /// Ordered key/value pairs. Keys are plain strings and insertion order is
    /// preserved and observable.
    Map(Vec<(String, Expression)>),
    /// An owned byte buffer.
    BinaryData(Vec<u8>),
}

/// The variant of an [`Expression`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprKind {
    Null,
    Value,
    Array,
    Map,
    BinaryData,
}

impl Expression {
    /// Create a `Value` from anything string-like.
    pub fn value(value: impl Into<String>) -> Self {
        Expression::Value(value.into())
    }

    /// Create a `BinaryData` from anything byte-like.
    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        Expression::BinaryData(bytes.into())
    }

    /// The variant of this node.
    pub fn kind(&self) -> ExprKind {
        match self {
            Expression::Null => ExprKind::Null,
            Expression::Value(_) => ExprKind::Value,
            Expression::Array(_) => ExprKind::Array,
            Expression::Map(_) => ExprKind::Map,
            Expression::BinaryData(_) => ExprKind::BinaryData,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Expression::Null)
    }

    /// The string payload, if this is a `Value`.
    pub fn as_value(&self) -> Option<&str> {
        match self {
            Expression::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_value_mut(&mut self) -> Option<&mut String> {
        match self {
            Expression::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Replace this node with a `Value`, discarding the previous variant.
    pub fn set_value(&mut self, value: impl Into<String>) {
        *self = Expression::Value(value.into());
    }

    /// The byte payload, if this is `BinaryData`.
    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Expression::BinaryData(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_binary_mut(&mut self) -> Option<&mut Vec<u8>> {
        match self {
            Expression::BinaryData(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Replace this node with `BinaryData`, discarding the previous variant.
    pub fn set_binary(&mut self, bytes: impl Into<Vec<u8>>) {
        *self = Expression::BinaryData(bytes.into());
    }

    /// The children, if this is an `Array`.
    pub fn as_array(&self) -> Option<&[Expression]> {
        match self {
            Expression::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Mutable access to the children of an `Array`, for indexing and append.
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Expression>> {
        match self {
            Expression::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The key/value pairs in insertion order, if this is a `Map`.
    pub fn as_pairs(&self) -> Option<&[(String, Expression)]> {
        match self {
            Expression::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Number of pairs in a `Map`, or `None` for any other variant.
    pub fn map_len(&self) -> Option<usize> {
        self.as_pairs().map(|pairs| pairs.len())
    }

    /// The key of the pair at `index`, in insertion order.
    pub fn map_key_at(&self, index: usize) -> Option<&str> {
        self.as_pairs()?.get(index).map(|(key, _)| key.as_str())
    }

    /// The value of the pair at `index`, in insertion order.
    pub fn map_value_at(&self, index: usize) -> Option<&Expression> {
        self.as_pairs()?.get(index).map(|(_, value)| value)
    }

    /// Look up a value by key. When duplicate keys were constructed by hand,
    /// the most recently written one wins.
    pub fn map_get(&self, key: &str) -> Option<&Expression> {
        self.as_pairs()?
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub fn map_get_mut(&mut self, key: &str) -> Option<&mut Expression> {
        match self {
            Expression::Map(pairs) => pairs
                .iter_mut()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Set `key` to `value`. An existing key keeps its position in the pair
    /// order and has its value replaced; a new key is appended. Has no effect
    /// unless this is a `Map`.
    pub fn map_insert(&mut self, key: impl Into<String>, value: Expression) {
        if let Expression::Map(pairs) = self {
            let key = key.into();
            match pairs.iter_mut().find(|(k, _)| *k == key) {
                Some(pair) => pair.1 = value,
                None => pairs.push((key, value)),
            }
        }
    }
}

impl fmt::Display for Expression {
    /// Renders the compact text form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&text::render(self, &WriteOptions::default(), 0))
    }
}

//! Read-only typed access to raw specification document fragments.
//!
//! Specification elements keep a handle to the document node they were
//! declared by and read their own fields through the typed accessors here,
//! rather than through a generic dictionary interface. Nodes are cheap to
//! clone and share: the underlying document fragment is reference-counted
//! and never mutated after parsing.

use std::rc::Rc;

use serde_yaml::Value;

use crate::error::SpecError;

/// A read-only view over one fragment of the raw specification document.
#[derive(Debug, Clone)]
pub struct Node(Rc<Value>);

impl Node {
    /// Wraps a parsed document fragment.
    pub fn new(value: Value) -> Self {
        Self(Rc::new(value))
    }

    /// Returns the child node under `key`, if present.
    pub fn get(&self, key: &str) -> Option<Node> {
        self.0.get(key).map(|v| Node(Rc::new(v.clone())))
    }

    /// Returns the string value of `key`, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Returns the numeric value of `key`.
    ///
    /// Absent keys are `Ok(None)`; a present key that is not an unsigned
    /// integer in u32 range is an error.
    pub fn get_u32(&self, key: &str) -> Result<Option<u32>, SpecError> {
        match self.0.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| SpecError::InvalidField {
                    field: key.to_string(),
                    expected: "an unsigned 32-bit integer",
                }),
        }
    }

    /// Returns the boolean value of `key`, defaulting to `false` when the
    /// key is absent or not a boolean.
    pub fn get_bool(&self, key: &str) -> bool {
        self.0.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Returns true if `key` is declared on this node (even with a null
    /// value).
    pub fn contains(&self, key: &str) -> bool {
        self.0.get(key).is_some()
    }

    /// Returns the entries of the sequence under `key` in declaration order.
    ///
    /// An absent key is an empty sequence; a present key that is not a
    /// sequence is an error.
    pub fn sequence(&self, key: &str) -> Result<Vec<Node>, SpecError> {
        match self.0.get(key) {
            None => Ok(Vec::new()),
            Some(Value::Sequence(items)) => {
                Ok(items.iter().map(|v| Node(Rc::new(v.clone()))).collect())
            }
            Some(_) => Err(SpecError::InvalidField {
                field: key.to_string(),
                expected: "a sequence",
            }),
        }
    }

    /// Exposes the underlying document value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

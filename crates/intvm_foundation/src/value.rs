//! Core value type moved through the interpreter's stacks.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::Type;

/// Dynamically-typed scalar produced and consumed by the stack machine.
///
/// Values are cheap to clone: strings share the catalog's allocation through
/// an `Arc`. Equality through `PartialEq` is structural, so `Int(1)` and
/// `Bool(true)` are different values; the interpreter's `==` operator applies
/// its own numeric coercion on top of this.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// 32-bit signed integer.
    Int(i32),
    /// Boolean, produced by comparison and logic operators.
    Bool(bool),
    /// String literal from the catalog's string table.
    String(Arc<str>),
}

impl Value {
    /// Returns the type of this value.
    #[must_use]
    pub const fn value_type(&self) -> Type {
        match self {
            Self::Int(_) => Type::Int,
            Self::Bool(_) => Type::Bool,
            Self::String(_) => Type::String,
        }
    }

    /// Returns true if this value is truthy.
    ///
    /// Non-zero integers, `true` and non-empty strings are truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Int(n) => *n != 0,
            Self::Bool(b) => *b,
            Self::String(s) => !s.is_empty(),
        }
    }

    /// Attempts to read this value as an integer.
    ///
    /// Booleans read as `0` or `1`; strings have no integer reading.
    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Bool(b) => Some(i32::from(*b)),
            Self::String(_) => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true if this value is a string.
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

// Convenience From implementations

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Self::String(s)
    }
}

//! Runtime type tags.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Runtime type of a [`Value`](crate::Value).
///
/// Used when reporting operand mismatches. `Number` never describes an
/// actual value; it names the expectation "an integer or a boolean".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Type {
    /// 32-bit signed integer.
    Int,
    /// Boolean (an integer truth value).
    Bool,
    /// String literal.
    String,
    /// Any value usable as an integer (`Int` or `Bool`).
    Number,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "int",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Number => "number",
        };
        f.write_str(name)
    }
}

//! Core values, types, and errors for intvm.
//!
//! This crate provides:
//! - [`Value`] - The dynamically-typed scalar moved through the interpreter's stacks
//! - [`Type`] - Runtime type tags used in diagnostics
//! - [`Error`] - Rich error types with execution context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod types;
pub mod value;

pub use error::{Error, ErrorContext, ErrorKind, ExecutionLimit, StackKind};
pub use types::Type;
pub use value::Value;

/// Result type alias for intvm operations.
pub type Result<T> = std::result::Result<T, Error>;

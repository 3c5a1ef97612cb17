//! Script container collaborators for the intvm interpreter.
//!
//! This crate provides:
//! - [`InstructionStream`] - Seekable little-endian cursor over compiled code
//! - [`ByteReader`] - In-memory [`InstructionStream`]
//! - [`Catalog`] - Procedure and string lookups used by the interpreter
//! - [`ScriptCatalog`] - In-memory [`Catalog`] built from procedure and string tables

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod catalog;
pub mod reader;

pub use catalog::{Catalog, Procedure, ScriptCatalog};
pub use reader::{ByteReader, InstructionStream};

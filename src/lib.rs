//! intvm - Interpreter for compiled `.INT` script procedures
//!
//! This crate re-exports all layers of the interpreter for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: intvm_vm         - Opcodes, assembler, disassembler, stack VM
//! Layer 1: intvm_container  - Instruction streams, procedure and string tables
//! Layer 0: intvm_foundation - Core types (Value, Type, Error)
//! ```

pub use intvm_container as container;
pub use intvm_foundation as foundation;
pub use intvm_vm as vm;

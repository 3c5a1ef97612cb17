//! Stack-based bytecode interpreter for compiled script procedures.
//!
//! This crate provides:
//! - [`Opcode`] - The modeled instruction set
//! - [`Assembler`] / [`disassemble`] - Bytecode construction and listing
//! - [`Vm`] - The interpreter: two stacks, frame bases, and the call protocol
//! - [`VmConfig`] - Execution limits and instruction tracing

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod assembler;
pub mod config;
pub mod disasm;
pub mod opcode;
pub mod vm;

pub use assembler::{Assembler, Label};
pub use config::VmConfig;
pub use disasm::{Instruction, disassemble};
pub use opcode::Opcode;
pub use vm::{HOST_RETURN_ADDRESS, MachineState, RunOutcome, Status, StopReason, Vm};

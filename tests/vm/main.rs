//! Integration tests for Layer 2: VM
//!
//! Tests for the call protocol, opcode semantics, and the disassembler.

mod opcodes;
mod protocol;

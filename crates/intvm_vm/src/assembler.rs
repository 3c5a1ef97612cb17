//! Bytecode assembler.
//!
//! Produces the byte layout the interpreter executes: little-endian opcode
//! words, with a 32-bit immediate after `push_d` and `push_string`. Jump and
//! call targets are ordinary `push_d` operands, so forward references are
//! emitted as a [`Label`] and patched once the target offset is known.

use crate::opcode::Opcode;

/// Location of a `push_d` immediate awaiting a target offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Label(usize);

/// Incremental bytecode builder.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Assembler {
    code: Vec<u8>,
}

impl Assembler {
    /// Creates an empty assembler.
    #[must_use]
    pub fn new() -> Self {
        Self { code: Vec::new() }
    }

    /// Emits an opcode word and returns its offset.
    ///
    /// For `push_d` and `push_string` the immediate must follow through
    /// [`emit_immediate`](Self::emit_immediate); prefer
    /// [`emit_push`](Self::emit_push) and
    /// [`emit_push_string`](Self::emit_push_string).
    pub fn emit(&mut self, op: Opcode) -> usize {
        self.emit_word(op.code())
    }

    /// Emits a raw 16-bit word and returns its offset.
    pub fn emit_word(&mut self, word: u16) -> usize {
        let offset = self.code.len();
        self.code.extend_from_slice(&word.to_le_bytes());
        offset
    }

    /// Emits a raw 32-bit immediate.
    pub fn emit_immediate(&mut self, value: i32) {
        self.code.extend_from_slice(&value.to_le_bytes());
    }

    /// Emits `push_d value` and returns the instruction offset.
    pub fn emit_push(&mut self, value: i32) -> usize {
        let offset = self.emit(Opcode::PushD);
        self.emit_immediate(value);
        offset
    }

    /// Emits `push_string index` and returns the instruction offset.
    pub fn emit_push_string(&mut self, index: i32) -> usize {
        let offset = self.emit(Opcode::PushString);
        self.emit_immediate(index);
        offset
    }

    /// Emits `push_d` with a placeholder operand to be patched later.
    pub fn emit_push_label(&mut self) -> Label {
        self.emit(Opcode::PushD);
        let label = Label(self.code.len());
        self.emit_immediate(0);
        label
    }

    /// Patches a label's operand with a code offset.
    ///
    /// # Panics
    /// Panics if `target` does not fit in a 32-bit immediate.
    pub fn patch(&mut self, label: Label, target: usize) {
        let Ok(target) = i32::try_from(target) else {
            panic!("code offset {target} does not fit in a push_d immediate");
        };
        self.code[label.0..label.0 + 4].copy_from_slice(&target.to_le_bytes());
    }

    /// Returns the offset the next instruction will be emitted at.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.code.len()
    }

    /// Returns the bytes emitted so far.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.code
    }

    /// Consumes the assembler and returns the bytecode.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.code
    }
}

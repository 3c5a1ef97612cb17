//! Bytecode listing.

use std::fmt;

use intvm_container::{ByteReader, InstructionStream};
use intvm_foundation::Result;

use crate::opcode::Opcode;

/// One decoded instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// Byte offset of the opcode word.
    pub offset: usize,
    /// Raw opcode word.
    pub word: u16,
    /// Decoded opcode, `None` for words outside the modeled set.
    pub opcode: Option<Opcode>,
    /// Immediate operand, if the opcode carries one.
    pub immediate: Option<i32>,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06X}  ", self.offset)?;
        match (self.opcode, self.immediate) {
            (Some(op), Some(imm)) => write!(f, "{op} {imm}"),
            (Some(op), None) => write!(f, "{op}"),
            (None, _) => write!(f, ".word 0x{:04X}", self.word),
        }
    }
}

/// Decodes a code buffer into a linear instruction listing.
///
/// Unknown words are listed as two-byte `.word` entries and decoding
/// continues after them, since the listing has no way to know their operand
/// layout.
///
/// # Errors
/// Fails if the buffer ends partway through an instruction.
pub fn disassemble(code: &[u8]) -> Result<Vec<Instruction>> {
    let mut reader = ByteReader::new(code);
    let mut listing = Vec::new();

    while reader.offset() < reader.len() {
        let offset = reader.offset();
        let word = reader.read16()?;
        let opcode = Opcode::from_u16(word);
        let immediate = match opcode {
            Some(op) if op.has_immediate() => Some(reader.read32()?),
            _ => None,
        };
        listing.push(Instruction {
            offset,
            word,
            opcode,
            immediate,
        });
    }

    Ok(listing)
}

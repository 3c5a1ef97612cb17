//! Instruction set understood by the interpreter.
//!
//! Every instruction starts with a 16-bit little-endian opcode word. Only
//! `push_d` and `push_string` carry an operand: a 32-bit immediate that
//! follows the opcode word. Everything else takes its operands from the
//! stacks.

#![allow(clippy::doc_markdown)]

/// A modeled opcode.
///
/// Opcodes outside this set decode to `None` in [`Opcode::from_u16`] and
/// stop the run loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Opcode {
    // === Markers ===
    /// Start of a critical section (no-op).
    StartCritical = 0x8002,
    /// End of a critical section (no-op).
    CriticalDone = 0x8003,

    // === Stack Operations ===
    /// Push the 32-bit immediate.
    PushD = 0xC001,
    /// Push the catalog string named by the 32-bit immediate.
    PushString = 0x9001,
    /// Move the top of the data stack onto the return stack.
    DToA = 0x800D,
    /// Move the top of the return stack onto the data stack.
    AToD = 0x800C,
    /// Pop and discard the top of the data stack.
    Pop = 0x801A,
    /// Swap the top two return stack entries.
    Swapa = 0x8019,

    // === Frames and Variables ===
    /// `[argc] -> []`, saves the frame base and opens a frame over the arguments.
    PushBase = 0x802B,
    /// Restore the frame base from the return stack.
    PopBase = 0x8029,
    /// Remove `frame base` values from the bottom of the data stack.
    PopToBase = 0x802A,
    /// Mark the current data stack length as the global base.
    SetGlobal = 0x802C,
    /// `[value, index] -> []`, write a global slot.
    StoreGlobal = 0x8013,
    /// `[index] -> [value]`, read a global slot.
    FetchGlobal = 0x8012,
    /// `[value, var] -> []`, write a frame slot.
    Store = 0x8031,
    /// `[var] -> [value]`, read a frame slot.
    Fetch = 0x8032,

    // === Control Flow ===
    /// `[target] -> []`, jump.
    Jmp = 0x8004,
    /// `[target, cond] -> []`, jump when `cond` is falsy.
    If = 0x802F,
    /// `[index] -> []`, jump to the procedure at `index`.
    Call = 0x8005,
    /// Jump to the address on top of the return stack.
    PopReturn = 0x801C,
    /// Halt the machine.
    ExitProg = 0x8010,

    // === Comparison ===
    /// Equal: `[a, b] -> [a == b]`
    Equal = 0x8033,
    /// Not equal: `[a, b] -> [a != b]`
    NotEqual = 0x8034,
    /// Less than or equal: `[a, b] -> [a <= b]`
    LessEqual = 0x8035,
    /// Greater than or equal: `[a, b] -> [a >= b]`
    GreaterEqual = 0x8036,
    /// Less than: `[a, b] -> [a < b]`
    Less = 0x8037,
    /// Greater than: `[a, b] -> [a > b]`
    Greater = 0x8038,

    // === Arithmetic ===
    /// Add: `[a, b] -> [a + b]`
    Add = 0x8039,
    /// Subtract: `[a, b] -> [a - b]`
    Sub = 0x803A,
    /// Multiply: `[a, b] -> [a * b]`
    Mul = 0x803B,
    /// Truncating divide: `[a, b] -> [a / b]`
    Div = 0x803C,
    /// Remainder: `[a, b] -> [a % b]`
    Mod = 0x803D,
    /// Negate: `[a] -> [-a]`
    Negate = 0x8046,

    // === Logic ===
    /// Logical and: `[a, b] -> [a && b]`
    And = 0x803E,
    /// Logical or: `[a, b] -> [a || b]`
    Or = 0x803F,
}

impl Opcode {
    /// Every modeled opcode.
    pub const ALL: [Opcode; 35] = [
        Self::StartCritical,
        Self::CriticalDone,
        Self::PushD,
        Self::PushString,
        Self::DToA,
        Self::AToD,
        Self::Pop,
        Self::Swapa,
        Self::PushBase,
        Self::PopBase,
        Self::PopToBase,
        Self::SetGlobal,
        Self::StoreGlobal,
        Self::FetchGlobal,
        Self::Store,
        Self::Fetch,
        Self::Jmp,
        Self::If,
        Self::Call,
        Self::PopReturn,
        Self::ExitProg,
        Self::Equal,
        Self::NotEqual,
        Self::LessEqual,
        Self::GreaterEqual,
        Self::Less,
        Self::Greater,
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Mod,
        Self::Negate,
        Self::And,
        Self::Or,
    ];

    /// Decodes a raw opcode word.
    #[must_use]
    pub const fn from_u16(word: u16) -> Option<Self> {
        let op = match word {
            0x8002 => Self::StartCritical,
            0x8003 => Self::CriticalDone,
            0xC001 => Self::PushD,
            0x9001 => Self::PushString,
            0x800D => Self::DToA,
            0x800C => Self::AToD,
            0x801A => Self::Pop,
            0x8019 => Self::Swapa,
            0x802B => Self::PushBase,
            0x8029 => Self::PopBase,
            0x802A => Self::PopToBase,
            0x802C => Self::SetGlobal,
            0x8013 => Self::StoreGlobal,
            0x8012 => Self::FetchGlobal,
            0x8031 => Self::Store,
            0x8032 => Self::Fetch,
            0x8004 => Self::Jmp,
            0x802F => Self::If,
            0x8005 => Self::Call,
            0x801C => Self::PopReturn,
            0x8010 => Self::ExitProg,
            0x8033 => Self::Equal,
            0x8034 => Self::NotEqual,
            0x8035 => Self::LessEqual,
            0x8036 => Self::GreaterEqual,
            0x8037 => Self::Less,
            0x8038 => Self::Greater,
            0x8039 => Self::Add,
            0x803A => Self::Sub,
            0x803B => Self::Mul,
            0x803C => Self::Div,
            0x803D => Self::Mod,
            0x8046 => Self::Negate,
            0x803E => Self::And,
            0x803F => Self::Or,
            _ => return None,
        };
        Some(op)
    }

    /// Returns the raw opcode word.
    #[must_use]
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Returns true if a 32-bit immediate follows the opcode word.
    #[must_use]
    pub const fn has_immediate(self) -> bool {
        matches!(self, Self::PushD | Self::PushString)
    }

    /// Returns the encoded size of the instruction in bytes.
    #[must_use]
    pub const fn encoded_len(self) -> usize {
        if self.has_immediate() { 6 } else { 2 }
    }

    /// Returns the assembler mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::StartCritical => "start_critical",
            Self::CriticalDone => "critical_done",
            Self::PushD => "push_d",
            Self::PushString => "push_string",
            Self::DToA => "d_to_a",
            Self::AToD => "a_to_d",
            Self::Pop => "pop",
            Self::Swapa => "swapa",
            Self::PushBase => "push_base",
            Self::PopBase => "pop_base",
            Self::PopToBase => "pop_to_base",
            Self::SetGlobal => "set_global",
            Self::StoreGlobal => "store_global",
            Self::FetchGlobal => "fetch_global",
            Self::Store => "store",
            Self::Fetch => "fetch",
            Self::Jmp => "jmp",
            Self::If => "if",
            Self::Call => "call",
            Self::PopReturn => "pop_return",
            Self::ExitProg => "exit_prog",
            Self::Equal => "equal",
            Self::NotEqual => "not_equal",
            Self::LessEqual => "less_equal",
            Self::GreaterEqual => "greater_equal",
            Self::Less => "less",
            Self::Greater => "greater",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Mod => "mod",
            Self::Negate => "negate",
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

impl From<Opcode> for u16 {
    fn from(op: Opcode) -> Self {
        op.code()
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

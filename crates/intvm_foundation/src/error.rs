//! Error types for the intvm interpreter.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::types::Type;

/// The main error type for intvm operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an unresolved procedure name error.
    #[must_use]
    pub fn unresolved_procedure(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnresolvedProcedure(name.into()))
    }

    /// Creates an unresolved procedure index error.
    #[must_use]
    pub fn unresolved_procedure_index(index: i32) -> Self {
        Self::new(ErrorKind::UnresolvedProcedureIndex(index))
    }

    /// Creates an unresolved string index error.
    #[must_use]
    pub fn unresolved_string(index: i32) -> Self {
        Self::new(ErrorKind::UnresolvedString(index))
    }

    /// Creates an unimplemented opcode error.
    #[must_use]
    pub fn unimplemented_opcode(opcode: u16, pc: usize) -> Self {
        Self::new(ErrorKind::UnimplementedOpcode { opcode, pc })
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(expected: Type, actual: Type) -> Self {
        Self::new(ErrorKind::TypeMismatch { expected, actual })
    }

    /// Creates a stack underflow error.
    #[must_use]
    pub fn stack_underflow(stack: StackKind) -> Self {
        Self::new(ErrorKind::StackUnderflow(stack))
    }

    /// Creates an index out of bounds error.
    #[must_use]
    pub fn index_out_of_bounds(index: i64, length: usize) -> Self {
        Self::new(ErrorKind::IndexOutOfBounds { index, length })
    }

    /// Creates a semantic limit exceeded error.
    #[must_use]
    pub fn limit_exceeded(limit: ExecutionLimit) -> Self {
        Self::new(ErrorKind::LimitExceeded(limit))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A procedure name passed to `call` is not in the catalog.
    #[error("unknown procedure: {0}")]
    UnresolvedProcedure(String),

    /// The `call` opcode named a procedure index absent from the catalog.
    #[error("unknown procedure index: {0}")]
    UnresolvedProcedureIndex(i32),

    /// `push_string` requested a string index absent from the string table.
    #[error("requested string {0} but it doesn't exist")]
    UnresolvedString(i32),

    /// The dispatch loop fetched an opcode it does not implement.
    #[error("unimplemented opcode 0x{opcode:04X} (pc=0x{pc:X})")]
    UnimplementedOpcode {
        /// The raw 16-bit opcode.
        opcode: u16,
        /// Program counter where the opcode was fetched.
        pc: usize,
    },

    /// An operand had the wrong runtime type.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The expected type.
        expected: Type,
        /// The actual type encountered.
        actual: Type,
    },

    /// Pop from an empty stack.
    #[error("{0} stack underflow")]
    StackUnderflow(StackKind),

    /// Integer division or modulo by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// A frame- or global-relative slot fell outside the data stack.
    #[error("index out of bounds: {index} (length {length})")]
    IndexOutOfBounds {
        /// The slot that was accessed.
        index: i64,
        /// The data stack length at the time of access.
        length: usize,
    },

    /// A jump, call or return target is not a valid code offset.
    #[error("invalid code address: {0}")]
    InvalidAddress(i64),

    /// A read ran past the end of the instruction stream.
    #[error("unexpected end of code at offset {offset} (length {len})")]
    UnexpectedEndOfCode {
        /// Offset the read started at.
        offset: usize,
        /// Total length of the stream.
        len: usize,
    },

    /// Execution limit exceeded (kill switch triggered).
    #[error("limit exceeded: {0}")]
    LimitExceeded(ExecutionLimit),
}

/// Identifies which of the two machine stacks an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackKind {
    /// The operand / local-storage stack.
    Data,
    /// The return-address and transfer stack.
    Return,
}

impl fmt::Display for StackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data => f.write_str("data"),
            Self::Return => f.write_str("return"),
        }
    }
}

/// Execution limits (kill switches) that can be exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionLimit {
    /// Maximum instructions executed by one run.
    MaxSteps {
        /// The configured limit.
        limit: u64,
    },
    /// Maximum depth of either stack.
    MaxStackDepth {
        /// The configured limit.
        limit: usize,
        /// Which stack grew too deep.
        stack: StackKind,
    },
}

impl fmt::Display for ExecutionLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxSteps { limit } => write!(f, "max steps ({limit}) exceeded"),
            Self::MaxStackDepth { limit, stack } => {
                write!(f, "max {stack} stack depth ({limit}) exceeded")
            }
        }
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Procedure being called at top level.
    pub procedure: Option<String>,
    /// Program counter of the failing instruction.
    pub pc: Option<usize>,
    /// Mnemonic of the failing instruction.
    pub opcode: Option<&'static str>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the top-level procedure name.
    #[must_use]
    pub fn with_procedure(mut self, procedure: impl Into<String>) -> Self {
        self.procedure = Some(procedure.into());
        self
    }

    /// Sets the failing instruction's location and mnemonic.
    #[must_use]
    pub fn with_instruction(mut self, pc: usize, opcode: &'static str) -> Self {
        self.pc = Some(pc);
        self.opcode = Some(opcode);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(opcode) = self.opcode {
            write!(f, "in {opcode}")?;
        }
        if let Some(pc) = self.pc {
            write!(f, " at 0x{pc:X}")?;
        }
        if let Some(procedure) = &self.procedure {
            write!(f, " (called from {procedure})")?;
        }
        Ok(())
    }
}

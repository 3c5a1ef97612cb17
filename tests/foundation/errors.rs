//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use intvm_foundation::{Error, ErrorContext, ErrorKind, ExecutionLimit, StackKind, Type};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_unresolved_procedure() {
    let err = Error::unresolved_procedure("talk_p_proc");
    assert!(matches!(err.kind, ErrorKind::UnresolvedProcedure(_)));
    assert!(format!("{err}").contains("talk_p_proc"));
}

#[test]
fn error_unresolved_string() {
    let err = Error::unresolved_string(104);
    assert_eq!(err.to_string(), "requested string 104 but it doesn't exist");
}

#[test]
fn error_unimplemented_opcode() {
    let err = Error::unimplemented_opcode(0x80A1, 0x1C);
    assert!(matches!(
        err.kind,
        ErrorKind::UnimplementedOpcode {
            opcode: 0x80A1,
            pc: 0x1C
        }
    ));
    assert_eq!(err.to_string(), "unimplemented opcode 0x80A1 (pc=0x1C)");
}

#[test]
fn error_type_mismatch() {
    let err = Error::type_mismatch(Type::Number, Type::String);
    let msg = format!("{err}");
    assert!(msg.contains("number"));
    assert!(msg.contains("string"));
}

#[test]
fn error_stack_underflow() {
    let err = Error::stack_underflow(StackKind::Return);
    assert_eq!(err.to_string(), "return stack underflow");
}

#[test]
fn error_index_out_of_bounds() {
    let err = Error::index_out_of_bounds(-1, 3);
    assert!(matches!(
        err.kind,
        ErrorKind::IndexOutOfBounds {
            index: -1,
            length: 3
        }
    ));
}

#[test]
fn error_limit_exceeded() {
    let err = Error::limit_exceeded(ExecutionLimit::MaxStackDepth {
        limit: 16,
        stack: StackKind::Data,
    });
    let msg = format!("{err}");
    assert!(msg.contains("data"));
    assert!(msg.contains("16"));
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn error_without_context() {
    let err = Error::new(ErrorKind::DivisionByZero);
    assert!(err.context.is_none());
}

#[test]
fn error_with_context() {
    let ctx = ErrorContext::new()
        .with_instruction(0x2A, "div")
        .with_procedure("map_enter_p_proc");
    let err = Error::new(ErrorKind::DivisionByZero).with_context(ctx);
    let ctx = err.context.as_ref().unwrap();
    assert_eq!(ctx.pc, Some(0x2A));
    assert_eq!(ctx.opcode, Some("div"));
    assert_eq!(
        ctx.to_string(),
        "in div at 0x2A (called from map_enter_p_proc)"
    );
}

//! Integration tests for individual opcode semantics

use intvm::container::{ByteReader, ScriptCatalog};
use intvm::foundation::{ErrorKind, StackKind, Type, Value};
use intvm::vm::{Assembler, Opcode, Vm};

/// Runs `body` as procedure `main` and returns the top of the stack after
/// `exit_prog`.
fn eval(body: impl FnOnce(&mut Assembler)) -> intvm::foundation::Result<Value> {
    let mut asm = Assembler::new();
    body(&mut asm);
    asm.emit(Opcode::ExitProg);
    let catalog = ScriptCatalog::new()
        .with_procedure("main", 0)
        .with_string(1, "abc")
        .with_string(2, "abd");
    Vm::new(ByteReader::new(asm.finish()), catalog).call("main", &[])
}

fn binary(op: Opcode, a: i32, b: i32) -> Value {
    eval(|asm| {
        asm.emit_push(a);
        asm.emit_push(b);
        asm.emit(op);
    })
    .unwrap()
}

// =============================================================================
// Arithmetic
// =============================================================================

#[test]
fn division_truncates_toward_zero() {
    assert_eq!(binary(Opcode::Div, 7, 2), Value::Int(3));
    assert_eq!(binary(Opcode::Div, -7, 2), Value::Int(-3));
    assert_eq!(binary(Opcode::Div, 7, -2), Value::Int(-3));
    assert_eq!(binary(Opcode::Mod, -7, 2), Value::Int(-1));
}

#[test]
fn arithmetic_wraps() {
    assert_eq!(binary(Opcode::Add, i32::MAX, 1), Value::Int(i32::MIN));
    assert_eq!(binary(Opcode::Mul, i32::MAX, 2), Value::Int(-2));
    assert_eq!(binary(Opcode::Div, i32::MIN, -1), Value::Int(i32::MIN));
}

#[test]
fn modulo_by_zero_fails() {
    let err = eval(|asm| {
        asm.emit_push(3);
        asm.emit_push(0);
        asm.emit(Opcode::Mod);
    })
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DivisionByZero));
}

#[test]
fn sub_uses_second_from_top_as_left_operand() {
    assert_eq!(binary(Opcode::Sub, 10, 4), Value::Int(6));
}

// =============================================================================
// Comparison
// =============================================================================

#[test]
fn integer_comparisons() {
    assert_eq!(binary(Opcode::LessEqual, 3, 3), Value::Bool(true));
    assert_eq!(binary(Opcode::Less, 3, 3), Value::Bool(false));
    assert_eq!(binary(Opcode::Greater, 4, 3), Value::Bool(true));
    assert_eq!(binary(Opcode::GreaterEqual, 2, 3), Value::Bool(false));
    assert_eq!(binary(Opcode::NotEqual, 2, 3), Value::Bool(true));
}

#[test]
fn string_comparisons() {
    let result = eval(|asm| {
        asm.emit_push_string(1);
        asm.emit_push_string(2);
        asm.emit(Opcode::Less);
    });
    assert_eq!(result.unwrap(), Value::Bool(true));

    let result = eval(|asm| {
        asm.emit_push_string(1);
        asm.emit_push_string(1);
        asm.emit(Opcode::Equal);
    });
    assert_eq!(result.unwrap(), Value::Bool(true));
}

#[test]
fn ordering_string_against_number_fails() {
    let err = eval(|asm| {
        asm.emit_push_string(1);
        asm.emit_push(1);
        asm.emit(Opcode::Greater);
    })
    .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::TypeMismatch {
            expected: Type::String,
            actual: Type::Int
        }
    ));
}

#[test]
fn comparison_results_feed_arithmetic() {
    let result = eval(|asm| {
        asm.emit_push(1);
        asm.emit_push(2);
        asm.emit(Opcode::Less);
        asm.emit_push(10);
        asm.emit(Opcode::Add);
    });
    assert_eq!(result.unwrap(), Value::Int(11));
}

// =============================================================================
// Logic
// =============================================================================

#[test]
fn logic_opcodes() {
    assert_eq!(binary(Opcode::And, 5, -1), Value::Bool(true));
    assert_eq!(binary(Opcode::And, 0, 1), Value::Bool(false));
    assert_eq!(binary(Opcode::Or, 0, 0), Value::Bool(false));
    assert_eq!(binary(Opcode::Or, 0, 7), Value::Bool(true));
}

// =============================================================================
// Stacks
// =============================================================================

#[test]
fn a_to_d_on_empty_return_stack_fails() {
    let err = eval(|asm| {
        asm.emit(Opcode::AToD);
        asm.emit(Opcode::AToD);
    })
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::StackUnderflow(StackKind::Return)));
}

#[test]
fn fetch_below_frame_fails() {
    let err = eval(|asm| {
        asm.emit_push(-5);
        asm.emit(Opcode::Fetch);
    })
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::IndexOutOfBounds { index: -5, .. }));
}

#[test]
fn non_integer_operand_fails() {
    let err = eval(|asm| {
        asm.emit_push_string(1);
        asm.emit(Opcode::Fetch);
    })
    .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::TypeMismatch {
            expected: Type::Number,
            actual: Type::String
        }
    ));
}

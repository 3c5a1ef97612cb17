//! Integration tests for calling procedures from the host

use intvm::container::{ByteReader, ScriptCatalog};
use intvm::foundation::{ErrorKind, Value};
use intvm::vm::{Assembler, Opcode, RunOutcome, StopReason, Vm};

/// Builds a three-procedure script:
/// - `greet(name)`: returns `"Hello, " + name`
/// - `add2(a, b)`: returns `a + b`
/// - `double(n)`: returns `n * 2`
fn script() -> Vm {
    let mut asm = Assembler::new();
    let mut catalog = ScriptCatalog::new().with_string(0, "Hello, ");

    let greet = asm.emit(Opcode::PushBase);
    asm.emit_push_string(0);
    asm.emit_push(0);
    asm.emit(Opcode::Fetch);
    asm.emit(Opcode::Add);
    asm.emit(Opcode::PopToBase);
    asm.emit(Opcode::PopReturn);
    catalog.add_procedure("greet", greet);

    let add2 = asm.emit(Opcode::PushBase);
    asm.emit_push(0);
    asm.emit(Opcode::Fetch);
    asm.emit_push(1);
    asm.emit(Opcode::Fetch);
    asm.emit(Opcode::Add);
    asm.emit(Opcode::PopBase);
    asm.emit(Opcode::PopReturn);
    catalog.add_procedure("add2", add2);

    let double = asm.emit(Opcode::PushBase);
    asm.emit_push(0);
    asm.emit(Opcode::Fetch);
    asm.emit_push(2);
    asm.emit(Opcode::Mul);
    asm.emit(Opcode::PopBase);
    asm.emit(Opcode::PopReturn);
    catalog.add_procedure("double", double);

    Vm::new(ByteReader::new(asm.finish()), catalog)
}

#[test]
fn call_returns_top_of_stack() {
    let mut vm = script();
    assert_eq!(
        vm.call("add2", &[Value::Int(3), Value::Int(4)]).unwrap(),
        Value::Int(7)
    );
}

#[test]
fn call_concatenates_strings() {
    let mut vm = script();
    assert_eq!(
        vm.call("greet", &[Value::from("Vic")]).unwrap(),
        Value::from("Hello, Vic")
    );
}

#[test]
fn calls_are_independent() {
    let mut vm = script();
    for n in 0..5 {
        assert_eq!(
            vm.call("add2", &[Value::Int(n), Value::Int(n)]).unwrap(),
            Value::Int(n * 2)
        );
    }
    assert_eq!(
        vm.call("greet", &[Value::Int(5)]).unwrap(),
        Value::from("Hello, 5")
    );
}

#[test]
fn unknown_procedure_is_reported_by_name() {
    let mut vm = script();
    let err = vm.call("destroy_p_proc", &[]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnresolvedProcedure(ref name) if name == "destroy_p_proc"));
    assert!(vm.state().data_stack().is_empty());
}

#[test]
fn wrong_argument_type_names_the_procedure() {
    let mut vm = script();
    let err = vm.call("double", &[Value::from("x")]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));
    let ctx = err.context.unwrap();
    assert_eq!(ctx.procedure.as_deref(), Some("double"));
    assert_eq!(ctx.opcode, Some("mul"));
}

#[test]
fn host_can_drive_the_loop_directly() {
    let mut asm = Assembler::new();
    asm.emit_push(2);
    asm.emit_push(3);
    asm.emit(Opcode::Mul);
    asm.emit(Opcode::ExitProg);
    let mut vm = Vm::new(ByteReader::new(asm.finish()), ScriptCatalog::new());

    assert_eq!(vm.run().unwrap(), RunOutcome::Halted);
    assert_eq!(vm.state().data_stack(), &[Value::Int(6)]);
    assert_eq!(vm.steps(), 4);
}

#[test]
fn run_stops_on_unknown_opcode() {
    let mut asm = Assembler::new();
    asm.emit(Opcode::StartCritical);
    asm.emit_word(0x8120);
    let mut vm = Vm::new(ByteReader::new(asm.finish()), ScriptCatalog::new());

    let outcome = vm.run().unwrap();
    assert_eq!(
        outcome,
        RunOutcome::Stopped(StopReason::UnimplementedOpcode {
            opcode: 0x8120,
            pc: 2
        })
    );
    assert!(!vm.state().is_halted());
}

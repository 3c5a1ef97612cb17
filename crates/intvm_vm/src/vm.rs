//! Stack-based virtual machine for compiled script procedures.
//!
//! The VM executes bytecode straight out of an [`InstructionStream`],
//! resolving call targets and string immediates through a [`Catalog`].
//!
//! # Execution model
//!
//! Two stacks drive execution. The data stack holds operands, arguments and
//! locals; locals are addressed relative to the frame base, globals relative
//! to the global base. The return stack holds return addresses, saved frame
//! bases and values moved over by `d_to_a`. Nothing tags return stack
//! entries, so frames only nest correctly when the compiled code pairs its
//! `push_base`/`pop_base` and call/return instructions.
//!
//! # Calling procedures
//!
//! [`Vm::call`] pushes the arguments in reverse order followed by their
//! count, pushes [`HOST_RETURN_ADDRESS`] on the return stack and runs from
//! the procedure's entry offset. Returning to that address hands control
//! back to the host, which pops the procedure's result off the data stack.

#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unnecessary_wraps)]

mod ops;
mod state;

pub use state::MachineState;

use std::cmp::Ordering;
use std::sync::Arc;

use intvm_container::{ByteReader, Catalog, InstructionStream, ScriptCatalog};
use intvm_foundation::{Error, ErrorContext, ErrorKind, ExecutionLimit, Result, Value};
use tracing::{debug, instrument, trace, warn};

use crate::config::VmConfig;
use crate::opcode::Opcode;
use state::{encode_index, expect_int};

/// Return address pushed for the host by [`Vm::call`].
///
/// It is the start of the stream. Compiled code never returns there on its
/// own, because a genuine return address always follows a call instruction,
/// so `pop_return` to this address ends the top-level invocation.
pub const HOST_RETURN_ADDRESS: usize = 0;

/// Why the run loop stopped without halting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The fetched opcode is not in the modeled instruction set.
    UnimplementedOpcode {
        /// The raw opcode word.
        opcode: u16,
        /// Where it was fetched.
        pc: usize,
    },
}

impl StopReason {
    /// Converts the stop into the equivalent error.
    #[must_use]
    pub fn into_error(self) -> Error {
        match self {
            Self::UnimplementedOpcode { opcode, pc } => Error::unimplemented_opcode(opcode, pc),
        }
    }
}

/// Result of a single [`Vm::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// The instruction executed; the machine can keep going.
    Running,
    /// The machine is halted.
    Halted,
    /// The loop cannot continue.
    Stopped(StopReason),
}

/// How a [`Vm::run`] ended. Fatal failures are the `Err` side of the result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// `exit_prog` ran or the top-level frame returned to the host.
    Halted,
    /// The loop stopped without halting.
    Stopped(StopReason),
}

/// Control transfer requested by an instruction handler.
enum Flow {
    /// Fall through to the instruction after the bytes just read.
    Next,
    /// Continue at the given offset.
    Jump(usize),
}

/// Stack-based virtual machine.
pub struct Vm<S = ByteReader, C = ScriptCatalog> {
    /// Compiled code of the whole script.
    script: S,
    /// Procedure and string tables.
    catalog: C,
    /// Stacks and registers.
    state: MachineState,
    /// Limits and diagnostics.
    config: VmConfig,
    /// Instructions executed by the current run.
    steps: u64,
}

impl<S: InstructionStream, C: Catalog> Vm<S, C> {
    /// Creates a VM with the default configuration.
    #[must_use]
    pub fn new(script: S, catalog: C) -> Self {
        Self::with_config(script, catalog, VmConfig::default())
    }

    /// Creates a VM with the given configuration.
    #[must_use]
    pub fn with_config(script: S, catalog: C, config: VmConfig) -> Self {
        Self {
            script,
            catalog,
            state: MachineState::new(config.max_stack_depth),
            config,
            steps: 0,
        }
    }

    /// Returns the machine state.
    #[must_use]
    pub fn state(&self) -> &MachineState {
        &self.state
    }

    /// Returns the machine state for direct manipulation.
    pub fn state_mut(&mut self) -> &mut MachineState {
        &mut self.state
    }

    /// Returns the catalog.
    #[must_use]
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    /// Returns the number of instructions executed by the last run.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Calls a named procedure and returns its result.
    ///
    /// # Errors
    /// Fails with `UnresolvedProcedure` before touching any state if `name`
    /// is not in the catalog. Fails with `UnimplementedOpcode` if the run
    /// stopped on an opcode outside the modeled set. Any fatal execution
    /// error is returned as is, with the procedure name added to its context.
    #[instrument(skip(self, args), fields(argc = args.len()))]
    pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Value> {
        let offset = self
            .catalog
            .procedure(name)
            .map(|procedure| procedure.offset)
            .ok_or_else(|| Error::unresolved_procedure(name))?;
        debug!(offset, "calling procedure");

        self.invoke(offset, args).map_err(|mut err| {
            let context = err.context.take().unwrap_or_default().with_procedure(name);
            err.with_context(context)
        })
    }

    fn invoke(&mut self, offset: usize, args: &[Value]) -> Result<Value> {
        self.enter(offset, args)?;
        let result = match self.run()? {
            RunOutcome::Halted => self.state.pop()?,
            RunOutcome::Stopped(reason) => return Err(reason.into_error()),
        };
        debug!(%result, steps = self.steps, "procedure returned");
        Ok(result)
    }

    /// Resets the state and lays out a top-level call frame.
    fn enter(&mut self, offset: usize, args: &[Value]) -> Result<()> {
        self.state.reset();
        for arg in args.iter().rev() {
            self.state.push(arg.clone())?;
        }
        self.state.push(Value::Int(encode_index(args.len())?))?;
        self.state
            .push_return(Value::Int(encode_index(HOST_RETURN_ADDRESS)?))?;
        self.state.pc = offset;
        Ok(())
    }

    /// Runs from the current pc until the machine halts or stops.
    ///
    /// # Errors
    /// Returns any fatal execution error; the state is left as it was when
    /// the failing instruction gave up.
    pub fn run(&mut self) -> Result<RunOutcome> {
        self.state.halted = false;
        self.steps = 0;

        loop {
            match self.step()? {
                Status::Running => {}
                Status::Halted => return Ok(RunOutcome::Halted),
                Status::Stopped(reason) => return Ok(RunOutcome::Stopped(reason)),
            }
        }
    }

    /// Fetches, decodes and executes one instruction.
    ///
    /// # Errors
    /// Returns any fatal execution error, or `LimitExceeded` once the
    /// configured step limit is reached. The limit error names the
    /// instruction that was about to run.
    pub fn step(&mut self) -> Result<Status> {
        if self.state.halted {
            return Ok(Status::Halted);
        }

        let pc = self.state.pc;
        self.script.seek(pc)?;
        let word = self.script.read16()?;
        let Some(op) = Opcode::from_u16(word) else {
            warn!(pc, "unimplemented opcode 0x{word:04X}");
            return Ok(Status::Stopped(StopReason::UnimplementedOpcode {
                opcode: word,
                pc,
            }));
        };

        if let Some(limit) = self.config.max_steps {
            if self.steps >= limit {
                warn!(pc, limit, "step limit reached");
                return Err(Error::limit_exceeded(ExecutionLimit::MaxSteps { limit })
                    .with_context(ErrorContext::new().with_instruction(pc, op.mnemonic())));
            }
        }

        if self.config.trace_instructions {
            trace!(
                pc,
                op = op.mnemonic(),
                data = self.state.data_stack().len(),
                ret = self.state.return_stack().len(),
                "exec"
            );
        }

        self.steps += 1;
        let flow = self.execute(op).map_err(|err| {
            if err.context.is_some() {
                err
            } else {
                err.with_context(ErrorContext::new().with_instruction(pc, op.mnemonic()))
            }
        })?;

        self.state.pc = match flow {
            Flow::Next => self.script.offset(),
            Flow::Jump(target) => target,
        };

        Ok(if self.state.halted {
            Status::Halted
        } else {
            Status::Running
        })
    }

    /// Executes one decoded instruction.
    fn execute(&mut self, op: Opcode) -> Result<Flow> {
        match op {
            Opcode::StartCritical | Opcode::CriticalDone => {}

            // Stack operations
            Opcode::PushD => {
                let value = self.script.read32()?;
                self.state.push(Value::Int(value))?;
            }
            Opcode::PushString => {
                let index = self.script.read32()?;
                let text = self
                    .catalog
                    .string(index)
                    .ok_or_else(|| Error::unresolved_string(index))?;
                self.state.push(Value::String(Arc::clone(text)))?;
            }
            Opcode::DToA => {
                let value = self.state.pop()?;
                self.state.push_return(value)?;
            }
            Opcode::AToD => {
                let value = self.state.pop_return()?;
                self.state.push(value)?;
            }
            Opcode::Pop => {
                self.state.pop()?;
            }
            Opcode::Swapa => self.state.swap_return()?,

            // Frames and variables
            Opcode::PushBase => self.state.push_base()?,
            Opcode::PopBase => self.state.pop_base()?,
            Opcode::PopToBase => self.state.pop_to_base(),
            Opcode::SetGlobal => self.state.set_global(),
            Opcode::StoreGlobal => {
                let var = self.state.pop_int()?;
                let value = self.state.pop()?;
                self.state.store_global(var, value)?;
            }
            Opcode::FetchGlobal => {
                let var = self.state.pop_int()?;
                let value = self.state.fetch_global(var)?;
                self.state.push(value)?;
            }
            Opcode::Store => {
                let var = self.state.pop_int()?;
                let value = self.state.pop()?;
                self.state.store_frame(var, value)?;
            }
            Opcode::Fetch => {
                let var = self.state.pop_int()?;
                let value = self.state.fetch_frame(var)?;
                self.state.push(value)?;
            }

            // Control flow
            Opcode::Jmp => {
                let target = self.state.pop()?;
                return Ok(Flow::Jump(address(&target)?));
            }
            Opcode::If => {
                let cond = self.state.pop()?;
                let target = self.state.pop()?;
                if !cond.is_truthy() {
                    return Ok(Flow::Jump(address(&target)?));
                }
            }
            Opcode::Call => {
                let index = self.state.pop_int()?;
                let procedure = self
                    .catalog
                    .procedure_at(index)
                    .ok_or_else(|| Error::unresolved_procedure_index(index))?;
                return Ok(Flow::Jump(procedure.offset));
            }
            Opcode::PopReturn => {
                let target = address(&self.state.pop_return()?)?;
                if target == HOST_RETURN_ADDRESS {
                    self.state.halted = true;
                }
                return Ok(Flow::Jump(target));
            }
            Opcode::ExitProg => self.state.halted = true,

            // Comparison
            Opcode::Equal => self.binary_op(ops::equal)?,
            Opcode::NotEqual => self.binary_op(ops::not_equal)?,
            Opcode::LessEqual => self.binary_op(|a, b| ops::compare(a, b, Ordering::is_le))?,
            Opcode::GreaterEqual => self.binary_op(|a, b| ops::compare(a, b, Ordering::is_ge))?,
            Opcode::Less => self.binary_op(|a, b| ops::compare(a, b, Ordering::is_lt))?,
            Opcode::Greater => self.binary_op(|a, b| ops::compare(a, b, Ordering::is_gt))?,

            // Arithmetic
            Opcode::Add => self.binary_op(ops::add)?,
            Opcode::Sub => self.binary_op(ops::sub)?,
            Opcode::Mul => self.binary_op(ops::mul)?,
            Opcode::Div => self.binary_op(ops::div_truncating)?,
            Opcode::Mod => self.binary_op(ops::rem)?,
            Opcode::Negate => {
                let a = self.state.pop()?;
                self.state.push(ops::negate(a)?)?;
            }

            // Logic
            Opcode::And => self.binary_op(ops::and)?,
            Opcode::Or => self.binary_op(ops::or)?,
        }

        Ok(Flow::Next)
    }

    fn binary_op<F>(&mut self, op: F) -> Result<()>
    where
        F: FnOnce(Value, Value) -> Result<Value>,
    {
        let b = self.state.pop()?;
        let a = self.state.pop()?;
        let result = op(a, b)?;
        self.state.push(result)
    }
}

/// Reads a jump, call or return target.
fn address(value: &Value) -> Result<usize> {
    let target = expect_int(value)?;
    usize::try_from(target)
        .map_err(|_| Error::new(ErrorKind::InvalidAddress(i64::from(target))))
}

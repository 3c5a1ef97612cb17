//! Stack machine state: two stacks, two base registers, pc and the halt flag.

use intvm_foundation::{Error, ExecutionLimit, Result, StackKind, Type, Value};

/// Mutable execution state shared by every instruction handler.
///
/// The return stack holds values rather than bare addresses: control
/// handlers read entries as integers, while `d_to_a`/`a_to_d` move arbitrary
/// values through it unchanged.
#[derive(Clone, Debug)]
pub struct MachineState {
    data: Vec<Value>,
    ret: Vec<Value>,
    pub(crate) pc: usize,
    global_base: usize,
    frame_base: usize,
    pub(crate) halted: bool,
    max_depth: usize,
}

impl MachineState {
    /// Creates empty state whose stacks may each grow to `max_depth` entries.
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self {
            data: Vec::new(),
            ret: Vec::new(),
            pc: 0,
            global_base: 0,
            frame_base: 0,
            halted: false,
            max_depth,
        }
    }

    /// Clears both stacks and resets every register.
    pub fn reset(&mut self) {
        self.data.clear();
        self.ret.clear();
        self.pc = 0;
        self.global_base = 0;
        self.frame_base = 0;
        self.halted = false;
    }

    /// Returns the data stack, bottom first.
    #[must_use]
    pub fn data_stack(&self) -> &[Value] {
        &self.data
    }

    /// Returns the return stack, bottom first.
    #[must_use]
    pub fn return_stack(&self) -> &[Value] {
        &self.ret
    }

    /// Returns the program counter.
    #[must_use]
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Sets the program counter.
    pub fn set_pc(&mut self, pc: usize) {
        self.pc = pc;
    }

    /// Returns the global base register.
    #[must_use]
    pub fn global_base(&self) -> usize {
        self.global_base
    }

    /// Returns the frame base register.
    #[must_use]
    pub fn frame_base(&self) -> usize {
        self.frame_base
    }

    /// Returns true once `exit_prog` ran or the top-level frame returned.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    // Data stack

    /// Pushes onto the data stack.
    ///
    /// # Errors
    /// Fails when the stack is at its depth limit.
    pub fn push(&mut self, value: Value) -> Result<()> {
        if self.data.len() >= self.max_depth {
            return Err(self.depth_exceeded(StackKind::Data));
        }
        self.data.push(value);
        Ok(())
    }

    /// Pops from the data stack.
    ///
    /// # Errors
    /// Fails when the stack is empty.
    pub fn pop(&mut self) -> Result<Value> {
        self.data
            .pop()
            .ok_or_else(|| Error::stack_underflow(StackKind::Data))
    }

    pub(crate) fn pop_int(&mut self) -> Result<i32> {
        let value = self.pop()?;
        expect_int(&value)
    }

    // Return stack

    /// Pushes onto the return stack.
    ///
    /// # Errors
    /// Fails when the stack is at its depth limit.
    pub fn push_return(&mut self, value: Value) -> Result<()> {
        if self.ret.len() >= self.max_depth {
            return Err(self.depth_exceeded(StackKind::Return));
        }
        self.ret.push(value);
        Ok(())
    }

    /// Pops from the return stack.
    ///
    /// # Errors
    /// Fails when the stack is empty.
    pub fn pop_return(&mut self) -> Result<Value> {
        self.ret
            .pop()
            .ok_or_else(|| Error::stack_underflow(StackKind::Return))
    }

    pub(crate) fn swap_return(&mut self) -> Result<()> {
        let len = self.ret.len();
        if len < 2 {
            return Err(Error::stack_underflow(StackKind::Return));
        }
        self.ret.swap(len - 1, len - 2);
        Ok(())
    }

    // Frames

    /// Pops `argc`, saves the frame base on the return stack and opens a
    /// frame whose slot 0 is the first of the `argc` values below it.
    pub(crate) fn push_base(&mut self) -> Result<()> {
        let argc = self.pop_int()?;
        let len = self.data.len();
        let base = usize::try_from(argc)
            .ok()
            .and_then(|argc| len.checked_sub(argc))
            .ok_or_else(|| Error::index_out_of_bounds(len as i64 - i64::from(argc), len))?;
        self.push_return(Value::Int(encode_index(self.frame_base)?))?;
        self.frame_base = base;
        Ok(())
    }

    pub(crate) fn pop_base(&mut self) -> Result<()> {
        let saved = self.pop_return()?;
        let base = expect_int(&saved)?;
        self.frame_base = usize::try_from(base)
            .map_err(|_| Error::index_out_of_bounds(i64::from(base), self.data.len()))?;
        Ok(())
    }

    /// Removes the first `frame base` values from the bottom of the data
    /// stack. The frame base itself is left unchanged.
    pub(crate) fn pop_to_base(&mut self) {
        let count = self.frame_base.min(self.data.len());
        self.data.drain(..count);
    }

    pub(crate) fn set_global(&mut self) {
        self.global_base = self.data.len();
    }

    // Slots

    pub(crate) fn fetch_frame(&self, var: i32) -> Result<Value> {
        self.load(self.frame_base, var)
    }

    pub(crate) fn store_frame(&mut self, var: i32, value: Value) -> Result<()> {
        self.store(self.frame_base, var, value)
    }

    pub(crate) fn fetch_global(&self, var: i32) -> Result<Value> {
        self.load(self.global_base, var)
    }

    pub(crate) fn store_global(&mut self, var: i32, value: Value) -> Result<()> {
        self.store(self.global_base, var, value)
    }

    fn load(&self, base: usize, var: i32) -> Result<Value> {
        let index = self.slot_index(base, var)?;
        self.data
            .get(index)
            .cloned()
            .ok_or_else(|| Error::index_out_of_bounds(index as i64, self.data.len()))
    }

    /// Writes a slot, growing the stack with zeroes when the slot lies past
    /// the top. Globals are allocated this way after `set_global`.
    fn store(&mut self, base: usize, var: i32, value: Value) -> Result<()> {
        let index = self.slot_index(base, var)?;
        if index >= self.data.len() {
            if index >= self.max_depth {
                return Err(self.depth_exceeded(StackKind::Data));
            }
            self.data.resize(index + 1, Value::Int(0));
        }
        self.data[index] = value;
        Ok(())
    }

    fn slot_index(&self, base: usize, var: i32) -> Result<usize> {
        let index = base as i64 + i64::from(var);
        usize::try_from(index).map_err(|_| Error::index_out_of_bounds(index, self.data.len()))
    }

    fn depth_exceeded(&self, stack: StackKind) -> Error {
        Error::limit_exceeded(ExecutionLimit::MaxStackDepth {
            limit: self.max_depth,
            stack,
        })
    }
}

/// Reads a value as an integer operand.
pub(crate) fn expect_int(value: &Value) -> Result<i32> {
    value
        .as_int()
        .ok_or_else(|| Error::type_mismatch(Type::Number, value.value_type()))
}

/// Encodes a stack index or code offset for storage on the return stack.
pub(crate) fn encode_index(index: usize) -> Result<i32> {
    i32::try_from(index).map_err(|_| Error::index_out_of_bounds(index as i64, index))
}

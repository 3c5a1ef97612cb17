//! Configuration for the interpreter.

/// Execution limits and diagnostics for a [`Vm`](crate::Vm).
#[derive(Clone, Debug)]
pub struct VmConfig {
    /// Maximum instructions one `run` may execute (`None` = unlimited).
    pub max_steps: Option<u64>,

    /// Maximum depth of the data stack and of the return stack.
    pub max_stack_depth: usize,

    /// Emit a `trace` event for every executed instruction.
    pub trace_instructions: bool,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            max_steps: Some(1_000_000),
            max_stack_depth: 65_536,
            trace_instructions: false,
        }
    }
}

impl VmConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration with no step limit.
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_steps: None,
            ..Self::default()
        }
    }

    /// Creates a configuration for debugging scripts, with instruction
    /// tracing on and a tight step limit.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            max_steps: Some(10_000),
            max_stack_depth: 4_096,
            trace_instructions: true,
        }
    }

    /// Builder method to set the step limit.
    #[must_use]
    pub fn with_max_steps(mut self, max_steps: Option<u64>) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Builder method to set the stack depth limit.
    #[must_use]
    pub fn with_max_stack_depth(mut self, depth: usize) -> Self {
        self.max_stack_depth = depth;
        self
    }

    /// Builder method to toggle instruction tracing.
    #[must_use]
    pub fn with_trace_instructions(mut self, enabled: bool) -> Self {
        self.trace_instructions = enabled;
        self
    }
}

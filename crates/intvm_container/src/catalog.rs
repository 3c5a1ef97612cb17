//! Procedure and string tables consulted by the interpreter.

use std::collections::HashMap;
use std::sync::Arc;

/// Entry descriptor for a compiled procedure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Procedure {
    /// Procedure name as it appears in the container.
    pub name: Arc<str>,
    /// Byte offset of the procedure's first instruction.
    pub offset: usize,
}

impl Procedure {
    /// Creates a procedure descriptor.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, offset: usize) -> Self {
        Self {
            name: name.into(),
            offset,
        }
    }
}

/// Lookups the interpreter needs from a script container.
///
/// Implement this trait to run the interpreter over a container parsed
/// elsewhere. All lookups return `None` for missing entries; the interpreter
/// turns those into fatal errors.
pub trait Catalog {
    /// Resolves a procedure by name.
    fn procedure(&self, name: &str) -> Option<&Procedure>;

    /// Resolves a procedure by its index in the procedure table.
    fn procedure_at(&self, index: i32) -> Option<&Procedure>;

    /// Resolves a string literal by its index in the string table.
    fn string(&self, index: i32) -> Option<&Arc<str>>;
}

/// In-memory [`Catalog`].
///
/// Procedures are indexed in insertion order. String indices are sparse:
/// containers address strings by their position in the string table, so
/// any `i32` key is accepted.
#[derive(Clone, Debug, Default)]
pub struct ScriptCatalog {
    procedures: Vec<Procedure>,
    by_name: HashMap<Arc<str>, usize>,
    strings: HashMap<i32, Arc<str>>,
}

impl ScriptCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add a procedure.
    #[must_use]
    pub fn with_procedure(mut self, name: impl Into<Arc<str>>, offset: usize) -> Self {
        self.add_procedure(name, offset);
        self
    }

    /// Builder method to add a string literal.
    #[must_use]
    pub fn with_string(mut self, index: i32, text: impl Into<Arc<str>>) -> Self {
        self.add_string(index, text);
        self
    }

    /// Adds a procedure and returns its index in the procedure table.
    ///
    /// A later procedure with the same name shadows the earlier one for name
    /// lookups; both keep their table index.
    pub fn add_procedure(&mut self, name: impl Into<Arc<str>>, offset: usize) -> usize {
        let procedure = Procedure::new(name, offset);
        let index = self.procedures.len();
        self.by_name.insert(Arc::clone(&procedure.name), index);
        self.procedures.push(procedure);
        index
    }

    /// Adds or replaces a string literal.
    pub fn add_string(&mut self, index: i32, text: impl Into<Arc<str>>) {
        self.strings.insert(index, text.into());
    }

    /// Returns the procedure table in index order.
    #[must_use]
    pub fn procedures(&self) -> &[Procedure] {
        &self.procedures
    }

    /// Returns the number of strings in the string table.
    #[must_use]
    pub fn string_count(&self) -> usize {
        self.strings.len()
    }
}

impl Catalog for ScriptCatalog {
    fn procedure(&self, name: &str) -> Option<&Procedure> {
        self.by_name.get(name).map(|&index| &self.procedures[index])
    }

    fn procedure_at(&self, index: i32) -> Option<&Procedure> {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.procedures.get(index))
    }

    fn string(&self, index: i32) -> Option<&Arc<str>> {
        self.strings.get(&index)
    }
}

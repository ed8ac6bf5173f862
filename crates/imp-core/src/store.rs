//! The variable store: an insertion-ordered map from names to values.
//!
//! Names are arbitrary [`Value`]s (integers, strings, markers, tuples of
//! those). The observable contract is that of an association list with
//! key uniqueness: updating an existing key keeps its position, new keys
//! append at the end, and reading an unset key yields [`Value::Unit`]
//! without mutating anything. Insertion order only matters for the
//! determinism of debug output.

use indexmap::IndexMap;

use crate::value::Value;

/// Name-to-value mapping threaded through evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    entries: IndexMap<Value, Value>,
}

impl Store {
    pub fn new() -> Self {
        Store::default()
    }

    /// Reads a name. Unset names read as `Unit`; the store is never
    /// mutated by a read.
    pub fn get(&self, name: &Value) -> Value {
        self.entries.get(name).cloned().unwrap_or(Value::Unit)
    }

    /// Binds `name` to `value`, last write wins. An existing key keeps
    /// its insertion position.
    pub fn set(&mut self, name: Value, value: Value) {
        self.entries.insert(name, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter()
    }
}

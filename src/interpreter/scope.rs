use im::HashMap;

use super::value::Value;

/// Identifier → value bindings used during evaluation.
///
/// Backed by a persistent map: clones share structure but never observe
/// each other's later bindings.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a name
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Add or replace a binding
    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// A copy of this environment with one more binding.
    pub fn with(&self, name: impl Into<String>, value: Value) -> Self {
        let mut env = self.clone();
        env.bind(name, value);
        env
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Evaluation scope for one payload expression.

use indexmap::IndexMap;

use crate::builtins;
use crate::namespace::Namespace;
use crate::value::Value;

/// Read-only name resolution for one evaluation.
///
/// Lookup order: local bindings, then the namespace, then builtins. A scope
/// never writes through to its namespace.
#[derive(Debug, Default)]
pub struct Scope<'a> {
    locals: IndexMap<String, Value>,
    namespace: Option<&'a Namespace>,
}

impl<'a> Scope<'a> {
    /// A scope with builtins only.
    pub fn new() -> Self {
        Self::default()
    }

    /// A scope layered over a module's bindings.
    pub fn over(namespace: &'a Namespace) -> Self {
        Self {
            locals: IndexMap::new(),
            namespace: Some(namespace),
        }
    }

    /// Adds a local binding, shadowing the namespace.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.locals.insert(name.into(), value);
    }

    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.define(name, value);
        self
    }

    /// Look up a name.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.locals.get(name) {
            return Some(value.clone());
        }
        if let Some(value) = self.namespace.and_then(|ns| ns.get(name)) {
            return Some(value.clone());
        }
        builtins::lookup(name)
    }

    pub fn namespace(&self) -> Option<&'a Namespace> {
        self.namespace
    }
}

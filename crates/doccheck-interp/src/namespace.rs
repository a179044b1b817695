// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Module-level binding tables.

use indexmap::IndexMap;

use crate::host::{ClassRef, NativeFunction};
use crate::value::Value;

/// A module's top-level bindings, in definition order.
///
/// Built once by the host program, then shared read-only (usually behind an
/// `Rc`) by every scope that evaluates against it.
#[derive(Debug, Default)]
pub struct Namespace {
    name: String,
    bindings: IndexMap<String, Value>,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bindings: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Binds `name`, replacing any previous binding.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Binds a class under its own name.
    pub fn bind_class(&mut self, class: ClassRef) {
        let name = class.name().to_string();
        self.bind(name, Value::Class(class));
    }

    /// Binds a free function under its own name.
    pub fn bind_function(&mut self, function: NativeFunction) {
        let name = function.name().to_string();
        self.bind(name, function.build());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::NativeClass;

    #[test]
    fn bindings_keep_definition_order() {
        let mut ns = Namespace::new("demo");
        ns.bind("b", Value::Int(2));
        ns.bind("a", Value::Int(1));
        ns.bind_class(NativeClass::new("C").build());
        let names: Vec<&str> = ns.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["b", "a", "C"]);
        assert_eq!(ns.name(), "demo");
    }

    #[test]
    fn rebinding_replaces() {
        let mut ns = Namespace::new("demo");
        ns.bind("x", Value::Int(1));
        ns.bind("x", Value::Int(5));
        assert_eq!(ns.len(), 1);
        assert!(ns.get("x").unwrap().py_eq(&Value::Int(5)));
    }
}

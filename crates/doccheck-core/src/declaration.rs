// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Declarations under check and how they are discovered.

use std::rc::Rc;

use tracing::{debug, info};

use doccheck_interp::{ClassRef, Member, MemberKind, Namespace, Scope, Value};

use crate::error::DiscoveryError;

/// Whether a declaration is a type or a free function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Type,
    Function,
}

/// A named unit whose documentation is scanned for tags.
#[derive(Debug, Clone)]
pub struct Declaration {
    name: String,
    kind: DeclarationKind,
    value: Value,
    namespace: Rc<Namespace>,
    docs: Vec<String>,
    members: Vec<Member>,
}

impl Declaration {
    /// A declaration with no documentation yet.
    pub fn new(name: impl Into<String>, kind: DeclarationKind, value: Value, namespace: Rc<Namespace>) -> Self {
        Self {
            name: name.into(),
            kind,
            value,
            namespace,
            docs: Vec::new(),
            members: Vec::new(),
        }
    }

    /// A type, with its own documentation and its directly-owned callables.
    pub fn from_class(class: ClassRef, namespace: Rc<Namespace>) -> Self {
        let mut decl = Self::new(class.name(), DeclarationKind::Type, Value::Class(class.clone()), namespace);
        decl.docs.extend(class.doc().map(str::to_string));
        decl.members = class.members();
        decl
    }

    /// A free function, documented by its own doc only.
    pub fn function(name: impl Into<String>, value: Value, doc: Option<String>, namespace: Rc<Namespace>) -> Self {
        let mut decl = Self::new(name, DeclarationKind::Function, value, namespace);
        decl.docs.extend(doc);
        decl
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.docs.push(doc.into());
        self
    }

    pub fn with_member(mut self, name: impl Into<String>, doc: Option<&str>) -> Self {
        self.members.push(Member {
            name: name.into(),
            doc: doc.map(str::to_string),
            kind: MemberKind::Method,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DeclarationKind {
        self.kind
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn namespace(&self) -> &Rc<Namespace> {
        &self.namespace
    }

    pub fn module(&self) -> &str {
        self.namespace.name()
    }

    /// Documentation in scan order: own blocks, then each member's doc by
    /// member name.
    pub fn documentation(&self) -> Vec<&str> {
        let mut members: Vec<&Member> = self.members.iter().collect();
        members.sort_by(|a, b| a.name.cmp(&b.name));
        self.docs
            .iter()
            .map(String::as_str)
            .chain(members.into_iter().filter_map(|m| m.doc.as_deref()))
            .collect()
    }

    /// Evaluation scope for this declaration's lines: the declaration under
    /// `alias` and its own name, over its module's bindings.
    pub fn scope(&self, alias: &str) -> Scope<'_> {
        Scope::over(&self.namespace)
            .with(self.name.clone(), self.value.clone())
            .with(alias, self.value.clone())
    }
}

/// Produces the declarations to check, in order.
pub trait Discover {
    fn discover(&self) -> Result<Vec<Declaration>, DiscoveryError>;
}

impl Discover for Vec<Declaration> {
    fn discover(&self) -> Result<Vec<Declaration>, DiscoveryError> {
        Ok(self.clone())
    }
}

/// A module: its bindings, scanned for the types and functions it defines.
#[derive(Debug, Clone)]
pub struct Module {
    namespace: Rc<Namespace>,
}

impl Module {
    pub fn new(namespace: Namespace) -> Self {
        Self {
            namespace: Rc::new(namespace),
        }
    }

    pub fn name(&self) -> &str {
        self.namespace.name()
    }

    pub fn namespace(&self) -> &Rc<Namespace> {
        &self.namespace
    }

    /// Types and functions whose home is this module, in binding order.
    /// Re-exported bindings stay visible in the namespace but are skipped.
    pub fn declarations(&self) -> Vec<Declaration> {
        let home = self.name();
        let mut found = Vec::new();
        for (name, value) in self.namespace.iter() {
            match value {
                Value::Class(class) if class.module() == home => {
                    found.push(Declaration::from_class(class.clone(), self.namespace.clone()));
                }
                Value::Function(function) if function.module() == home => {
                    found.push(Declaration::function(
                        name,
                        value.clone(),
                        function.doc_text().map(str::to_string),
                        self.namespace.clone(),
                    ));
                }
                Value::Class(_) | Value::Function(_) => {
                    debug!(module = home, binding = name, "skipping re-exported binding");
                }
                _ => {}
            }
        }
        found
    }
}

/// A set of modules, optionally narrowed to some of them by name.
#[derive(Debug, Clone, Default)]
pub struct Package {
    modules: Vec<Module>,
    selected: Vec<String>,
}

impl Package {
    pub fn new(modules: Vec<Module>) -> Self {
        Self {
            modules,
            selected: Vec::new(),
        }
    }

    /// Restrict discovery to the named modules. Empty means all.
    pub fn select(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.selected = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Modules discovery scans, in package order. Naming a module the
    /// package does not have is an error.
    pub fn selected_modules(&self) -> Result<Vec<&Module>, DiscoveryError> {
        for name in &self.selected {
            if !self.modules.iter().any(|m| m.name() == name) {
                return Err(DiscoveryError::UnknownModule(name.clone()));
            }
        }
        Ok(self
            .modules
            .iter()
            .filter(|m| self.selected.is_empty() || self.selected.iter().any(|s| s == m.name()))
            .collect())
    }
}

impl Discover for Package {
    fn discover(&self) -> Result<Vec<Declaration>, DiscoveryError> {
        let mut declarations = Vec::new();
        for module in self.selected_modules()? {
            let found = module.declarations();
            info!(module = module.name(), declarations = found.len(), "scanned module");
            declarations.extend(found);
        }
        Ok(declarations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doccheck_interp::{NativeClass, NativeFunction};

    fn module() -> Module {
        let mut ns = Namespace::new("shapes");
        ns.bind_class(
            NativeClass::new("Square")
                .in_module("shapes")
                .doc("Square doc")
                .method("zoom", Some("zoom doc"))
                .method("area", Some("area doc"))
                .method("undocumented", None)
                .build(),
        );
        ns.bind_class(NativeClass::new("Imported").in_module("elsewhere").build());
        ns.bind_function(
            NativeFunction::new("helper", |_| Ok(Value::None))
                .in_module("shapes")
                .doc(">>test: True"),
        );
        ns.bind("CONSTANT", Value::Int(3));
        Module::new(ns)
    }

    #[test]
    fn module_yields_home_declarations_only() {
        let decls = module().declarations();
        let names: Vec<&str> = decls.iter().map(Declaration::name).collect();
        assert_eq!(names, vec!["Square", "helper"]);
        assert_eq!(decls[0].kind(), DeclarationKind::Type);
        assert_eq!(decls[1].kind(), DeclarationKind::Function);
        assert_eq!(decls[1].module(), "shapes");
    }

    #[test]
    fn documentation_is_own_then_members_by_name() {
        let decls = module().declarations();
        assert_eq!(decls[0].documentation(), vec!["Square doc", "area doc", "zoom doc"]);
        assert_eq!(decls[1].documentation(), vec![">>test: True"]);
    }

    #[test]
    fn scope_binds_alias_and_own_name() {
        let decls = module().declarations();
        let scope = decls[0].scope("cls");
        assert!(scope.get("cls").unwrap().is_same(decls[0].value()));
        assert!(scope.get("Square").unwrap().is_same(decls[0].value()));
        assert!(scope.get("CONSTANT").is_some());
    }

    #[test]
    fn package_selection() {
        let package = Package::new(vec![module()]);
        assert_eq!(package.discover().unwrap().len(), 2);
        assert_eq!(package.clone().select(["shapes"]).discover().unwrap().len(), 2);
        assert_eq!(package.selected_modules().unwrap().len(), 1);
        let err = package.select(["nope"]).discover().unwrap_err();
        assert!(matches!(err, DiscoveryError::UnknownModule(name) if name == "nope"));
    }
}

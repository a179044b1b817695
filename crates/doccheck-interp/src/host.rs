// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Host binding surface: how native Rust types show up to payload expressions.
//!
//! A program under check exposes its types as [`Class`] values and its
//! instances as [`Object`] values. [`NativeClass`] and [`NativeFunction`]
//! cover the common case of a type described by closures.

use std::any::Any;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::interp::RuntimeError;
use crate::value::{Args, Value};

pub type ClassRef = Rc<dyn Class>;
pub type ObjectRef = Rc<dyn Object>;

/// Boxed native callable.
pub type NativeFn = Box<dyn Fn(Args) -> Result<Value, RuntimeError>>;

/// Downcasting support for host objects.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A host instance.
pub trait Object: AsAny {
    fn type_name(&self) -> &str;

    /// Data attribute lookup. Methods go through [`Object::call_method`].
    fn get_attr(&self, _name: &str) -> Option<Value> {
        None
    }

    fn has_method(&self, _name: &str) -> bool {
        false
    }

    fn call_method(&self, name: &str, _args: Args) -> Result<Value, RuntimeError> {
        Err(RuntimeError::AttributeError {
            ty: self.type_name().to_string(),
            attr: name.to_string(),
        })
    }

    fn truthy(&self) -> bool {
        true
    }

    /// Value equality beyond identity, which the evaluator checks first.
    fn equals(&self, _other: &Value) -> bool {
        false
    }

    fn repr(&self) -> String {
        format!("<{} object>", self.type_name())
    }

    /// `str()` text.
    fn display(&self) -> String {
        self.repr()
    }
}

/// What kind of callable a class member is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// Called on an instance.
    Method,
    /// Called on the class, no receiver.
    Static,
    /// Called on the class; the Python `@classmethod` shape.
    ClassMethod,
}

/// A directly-owned callable member of a class, as seen by discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub doc: Option<String>,
    pub kind: MemberKind,
}

/// A host type.
pub trait Class {
    fn name(&self) -> &str;

    /// Name of the module that defines this type.
    fn module(&self) -> &str;

    /// The type's own docstring. Other strings in its body are not
    /// documentation.
    fn doc(&self) -> Option<&str> {
        None
    }

    /// Directly-owned callables, with their documentation.
    fn members(&self) -> Vec<Member> {
        Vec::new()
    }

    fn construct(&self, args: Args) -> Result<Value, RuntimeError>;

    /// Class-level data attribute.
    fn class_attr(&self, _name: &str) -> Option<Value> {
        None
    }

    /// Whether `name` is a static or class method.
    fn has_static(&self, _name: &str) -> bool {
        false
    }

    fn call_static(&self, name: &str, _args: Args) -> Result<Value, RuntimeError> {
        Err(RuntimeError::AttributeError {
            ty: self.name().to_string(),
            attr: name.to_string(),
        })
    }
}

struct StaticMember {
    doc: Option<String>,
    kind: MemberKind,
    func: NativeFn,
}

/// A [`Class`] assembled from closures.
///
/// ```ignore
/// let point = NativeClass::new("Point")
///     .in_module("geometry")
///     .doc(">>example1: Point(1, 2)")
///     .constructor(|args| Point::from_args(&args))
///     .method("norm", Some(">>test: cls.example1.norm() > 2"))
///     .build();
/// ```
pub struct NativeClass {
    name: String,
    module: String,
    doc: Option<String>,
    constructor: Option<NativeFn>,
    methods: IndexMap<String, Option<String>>,
    statics: IndexMap<String, StaticMember>,
    attrs: IndexMap<String, Value>,
}

impl NativeClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: String::new(),
            doc: None,
            constructor: None,
            methods: IndexMap::new(),
            statics: IndexMap::new(),
            attrs: IndexMap::new(),
        }
    }

    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    pub fn doc(mut self, text: impl Into<String>) -> Self {
        self.doc = Some(text.into());
        self
    }

    pub fn constructor(
        mut self,
        f: impl Fn(Args) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        self.constructor = Some(Box::new(f));
        self
    }

    /// Declares an instance method implemented by the instance's [`Object`].
    pub fn method(mut self, name: impl Into<String>, doc: Option<&str>) -> Self {
        self.methods.insert(name.into(), doc.map(str::to_string));
        self
    }

    pub fn static_method(
        self,
        name: impl Into<String>,
        doc: Option<&str>,
        f: impl Fn(Args) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        self.with_static(name.into(), doc, MemberKind::Static, Box::new(f))
    }

    pub fn class_method(
        self,
        name: impl Into<String>,
        doc: Option<&str>,
        f: impl Fn(Args) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        self.with_static(name.into(), doc, MemberKind::ClassMethod, Box::new(f))
    }

    pub fn attr(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attrs.insert(name.into(), value);
        self
    }

    pub fn build(self) -> ClassRef {
        Rc::new(self)
    }

    fn with_static(mut self, name: String, doc: Option<&str>, kind: MemberKind, func: NativeFn) -> Self {
        self.statics.insert(
            name,
            StaticMember {
                doc: doc.map(str::to_string),
                kind,
                func,
            },
        );
        self
    }
}

impl Class for NativeClass {
    fn name(&self) -> &str {
        &self.name
    }

    fn module(&self) -> &str {
        &self.module
    }

    fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    fn members(&self) -> Vec<Member> {
        let methods = self.methods.iter().map(|(name, doc)| Member {
            name: name.clone(),
            doc: doc.clone(),
            kind: MemberKind::Method,
        });
        let statics = self.statics.iter().map(|(name, member)| Member {
            name: name.clone(),
            doc: member.doc.clone(),
            kind: member.kind,
        });
        methods.chain(statics).collect()
    }

    fn construct(&self, args: Args) -> Result<Value, RuntimeError> {
        match &self.constructor {
            Some(f) => f(args),
            None => Err(RuntimeError::TypeError(format!(
                "cannot create '{}' instances",
                self.name
            ))),
        }
    }

    fn class_attr(&self, name: &str) -> Option<Value> {
        self.attrs.get(name).cloned()
    }

    fn has_static(&self, name: &str) -> bool {
        self.statics.contains_key(name)
    }

    fn call_static(&self, name: &str, args: Args) -> Result<Value, RuntimeError> {
        match self.statics.get(name) {
            Some(member) => (member.func)(args),
            None => Err(RuntimeError::AttributeError {
                ty: self.name.clone(),
                attr: name.to_string(),
            }),
        }
    }
}

/// A host free function.
pub struct NativeFunction {
    name: String,
    module: String,
    doc: Option<String>,
    func: NativeFn,
}

impl NativeFunction {
    pub fn new(
        name: impl Into<String>,
        f: impl Fn(Args) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            module: String::new(),
            doc: None,
            func: Box::new(f),
        }
    }

    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    pub fn doc(mut self, text: impl Into<String>) -> Self {
        self.doc = Some(text.into());
        self
    }

    pub fn build(self) -> Value {
        Value::Function(Rc::new(self))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn doc_text(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn call(&self, args: Args) -> Result<Value, RuntimeError> {
        (self.func)(args)
    }
}

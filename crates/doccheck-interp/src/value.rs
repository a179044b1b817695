// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Runtime values for the payload evaluator.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::host::{ClassRef, NativeFunction, ObjectRef};
use crate::interp::RuntimeError;

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    List(Rc<RefCell<Vec<Value>>>),
    Tuple(Rc<[Value]>),
    Dict(Rc<RefCell<IndexMap<DictKey, Value>>>),
    /// A host type: callable constructor plus class-level attributes.
    Class(ClassRef),
    /// A host instance.
    Object(ObjectRef),
    /// A host free function.
    Function(Rc<NativeFunction>),
    /// A builtin function, by name.
    Builtin(&'static str),
    /// A method taken as a value, called later.
    BoundMethod { receiver: Box<Value>, method: String },
}

impl Value {
    pub fn str(s: impl Into<Rc<str>>) -> Self {
        Value::Str(s.into())
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(items.into())
    }

    pub fn dict(entries: IndexMap<DictKey, Value>) -> Self {
        Value::Dict(Rc::new(RefCell::new(entries)))
    }

    pub fn class(class: ClassRef) -> Self {
        Value::Class(class)
    }

    pub fn object(object: impl crate::host::Object + 'static) -> Self {
        Value::Object(Rc::new(object))
    }

    /// Type name as shown in error messages.
    pub fn type_name(&self) -> String {
        match self {
            Value::None => "NoneType".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Int(_) => "int".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::Str(_) => "str".to_string(),
            Value::List(_) => "list".to_string(),
            Value::Tuple(_) => "tuple".to_string(),
            Value::Dict(_) => "dict".to_string(),
            Value::Class(_) => "type".to_string(),
            Value::Object(o) => o.type_name().to_string(),
            Value::Function(_) => "function".to_string(),
            Value::Builtin(_) => "builtin_function_or_method".to_string(),
            Value::BoundMethod { .. } => "method".to_string(),
        }
    }

    /// Truthiness: empty containers, zero and `None` are false.
    pub fn truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.borrow().is_empty(),
            Value::Tuple(items) => !items.is_empty(),
            Value::Dict(entries) => !entries.borrow().is_empty(),
            Value::Object(o) => o.truthy(),
            Value::Class(_) | Value::Function(_) | Value::Builtin(_) | Value::BoundMethod { .. } => true,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view; `bool` counts as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Bool(b) => Some(*b as i64),
            _ => None,
        }
    }

    /// Numeric view; integers widen to float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            other => other.as_int().map(|n| n as f64),
        }
    }

    /// Identity comparison (`is`). Scalars compare by value, shared values by address.
    pub fn is_same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Tuple(a), Value::Tuple(b)) => Rc::ptr_eq(a, b),
            (Value::Dict(a), Value::Dict(b)) => Rc::ptr_eq(a, b),
            (Value::Class(a), Value::Class(b)) => same_address(Rc::as_ptr(a), Rc::as_ptr(b)),
            (Value::Object(a), Value::Object(b)) => same_address(Rc::as_ptr(a), Rc::as_ptr(b)),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            _ => false,
        }
    }

    /// Equality (`==`).
    pub fn py_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                Rc::ptr_eq(a, b) || seq_eq(&a.borrow(), &b.borrow())
            }
            (Value::Tuple(a), Value::Tuple(b)) => seq_eq(a, b),
            (Value::Dict(a), Value::Dict(b)) => {
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len()
                    && a.iter().all(|(k, v)| b.get(k).is_some_and(|w| v.py_eq(w)))
            }
            (Value::Object(a), _) => {
                self.is_same(other) || a.equals(other)
            }
            (_, Value::Object(b)) => b.equals(self),
            (Value::BoundMethod { receiver: ra, method: ma }, Value::BoundMethod { receiver: rb, method: mb }) => {
                ma == mb && ra.is_same(rb)
            }
            (Value::Float(a), Value::Float(b)) => a == b,
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a.eq_num(b),
                _ => self.is_same(other),
            },
        }
    }

    /// Ordering for `<`, `sorted`, `min`, `max`. `None` when the types do not order.
    pub fn py_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            (Value::List(a), Value::List(b)) => seq_cmp(&a.borrow(), &b.borrow()),
            (Value::Tuple(a), Value::Tuple(b)) => seq_cmp(a, b),
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a.partial_cmp_num(b),
                _ => None,
            },
        }
    }

    pub(crate) fn as_number(&self) -> Option<Num> {
        match self {
            Value::Int(n) => Some(Num::Int(*n)),
            Value::Bool(b) => Some(Num::Int(*b as i64)),
            Value::Float(f) => Some(Num::Float(*f)),
            _ => None,
        }
    }

    /// `repr()` text: strings quoted, containers recursive.
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => quote(s),
            Value::Object(o) => o.repr(),
            other => other.to_string(),
        }
    }
}

/// `str()` text.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", format_float(*x)),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(items) => {
                let items = items.borrow();
                write!(f, "[{}]", join_repr(items.iter()))
            }
            Value::Tuple(items) if items.len() == 1 => write!(f, "({},)", items[0].repr()),
            Value::Tuple(items) => write!(f, "({})", join_repr(items.iter())),
            Value::Dict(entries) => {
                let entries = entries.borrow();
                let parts: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.to_value().repr(), v.repr()))
                    .collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            Value::Class(c) => write!(f, "<class '{}'>", c.name()),
            Value::Object(o) => write!(f, "{}", o.display()),
            Value::Function(func) => write!(f, "<function {}>", func.name()),
            Value::Builtin(name) => write!(f, "<built-in function {}>", name),
            Value::BoundMethod { receiver, method } => {
                write!(f, "<bound method {}.{}>", receiver.type_name(), method)
            }
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.repr())
    }
}

fn same_address<T: ?Sized, U: ?Sized>(a: *const T, b: *const U) -> bool {
    a as *const () == b as *const ()
}

fn seq_eq(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.py_eq(y))
}

fn seq_cmp(a: &[Value], b: &[Value]) -> Option<Ordering> {
    for (x, y) in a.iter().zip(b) {
        if x.py_eq(y) {
            continue;
        }
        return x.py_cmp(y);
    }
    Some(a.len().cmp(&b.len()))
}

fn join_repr<'a>(items: impl Iterator<Item = &'a Value>) -> String {
    items.map(|v| v.repr()).collect::<Vec<_>>().join(", ")
}

/// Single-quoted string literal, switching to double quotes when the text holds a `'`.
fn quote(s: &str) -> String {
    let delim = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(delim);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delim => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(delim);
    out
}

/// Shortest round-trip float text, always with a decimal point or exponent.
pub(crate) fn format_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let text = format!("{:?}", x);
    match text.find('e') {
        Some(pos) if !text[pos + 1..].starts_with('-') => {
            format!("{}e+{}", &text[..pos], &text[pos + 1..])
        }
        _ => text,
    }
}

/// Numeric operand after `bool` → `int` promotion.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    pub(crate) fn to_f64(self) -> f64 {
        match self {
            Num::Int(n) => n as f64,
            Num::Float(f) => f,
        }
    }

    fn eq_num(self, other: Num) -> bool {
        match (self, other) {
            (Num::Int(a), Num::Int(b)) => a == b,
            (a, b) => a.to_f64() == b.to_f64(),
        }
    }

    fn partial_cmp_num(self, other: Num) -> Option<Ordering> {
        match (self, other) {
            (Num::Int(a), Num::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.to_f64().partial_cmp(&b.to_f64()),
        }
    }
}

/// Hashable subset of values, usable as dict keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DictKey {
    None,
    Bool(bool),
    Int(i64),
    /// Non-integral float, by bit pattern. Integral floats normalize to `Int`.
    Float(u64),
    Str(Rc<str>),
    Tuple(Vec<DictKey>),
}

impl DictKey {
    pub fn from_value(value: &Value) -> Result<DictKey, RuntimeError> {
        match value {
            Value::None => Ok(DictKey::None),
            Value::Bool(b) => Ok(DictKey::Bool(*b)),
            Value::Int(n) => Ok(DictKey::Int(*n)),
            Value::Float(f) => {
                if f.fract() == 0.0 && f.abs() < 9.2e18 {
                    Ok(DictKey::Int(*f as i64))
                } else {
                    Ok(DictKey::Float(f.to_bits()))
                }
            }
            Value::Str(s) => Ok(DictKey::Str(s.clone())),
            Value::Tuple(items) => items
                .iter()
                .map(DictKey::from_value)
                .collect::<Result<Vec<_>, _>>()
                .map(DictKey::Tuple),
            other => Err(RuntimeError::TypeError(format!(
                "unhashable type: '{}'",
                other.type_name()
            ))),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            DictKey::None => Value::None,
            DictKey::Bool(b) => Value::Bool(*b),
            DictKey::Int(n) => Value::Int(*n),
            DictKey::Float(bits) => Value::Float(f64::from_bits(*bits)),
            DictKey::Str(s) => Value::Str(s.clone()),
            DictKey::Tuple(items) => Value::tuple(items.iter().map(DictKey::to_value).collect()),
        }
    }
}

/// Call arguments: positional values plus keyword values in call order.
#[derive(Debug, Clone, Default)]
pub struct Args {
    positional: Vec<Value>,
    keywords: IndexMap<String, Value>,
}

impl Args {
    pub fn new(positional: Vec<Value>) -> Self {
        Self { positional, keywords: IndexMap::new() }
    }

    pub fn with_keywords(positional: Vec<Value>, keywords: IndexMap<String, Value>) -> Self {
        Self { positional, keywords }
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn keywords(&self) -> &IndexMap<String, Value> {
        &self.keywords
    }

    /// Number of positional arguments.
    pub fn len(&self) -> usize {
        self.positional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keywords.is_empty()
    }

    /// Argument by position, falling back to its keyword name.
    pub fn get(&self, index: usize, name: &str) -> Option<&Value> {
        self.positional.get(index).or_else(|| self.keywords.get(name))
    }

    pub fn require(&self, index: usize, name: &str, func: &str) -> Result<&Value, RuntimeError> {
        self.get(index, name).ok_or_else(|| {
            RuntimeError::TypeError(format!("{}() missing required argument: '{}'", func, name))
        })
    }

    pub fn int(&self, index: usize, name: &str, func: &str) -> Result<i64, RuntimeError> {
        let value = self.require(index, name, func)?;
        value.as_int().ok_or_else(|| mismatch(func, name, "int", value))
    }

    pub fn float(&self, index: usize, name: &str, func: &str) -> Result<f64, RuntimeError> {
        let value = self.require(index, name, func)?;
        value.as_float().ok_or_else(|| mismatch(func, name, "float", value))
    }

    pub fn string(&self, index: usize, name: &str, func: &str) -> Result<Rc<str>, RuntimeError> {
        match self.require(index, name, func)? {
            Value::Str(s) => Ok(s.clone()),
            other => Err(mismatch(func, name, "str", other)),
        }
    }

    /// Optional string argument; absent or `None` yields `None`.
    pub fn string_or_none(&self, index: usize, name: &str, func: &str) -> Result<Option<Rc<str>>, RuntimeError> {
        match self.get(index, name) {
            None | Some(Value::None) => Ok(None),
            Some(Value::Str(s)) => Ok(Some(s.clone())),
            Some(other) => Err(mismatch(func, name, "str", other)),
        }
    }

    /// Rejects surplus positional arguments and keywords not in `names`.
    pub fn expect_at_most(&self, names: &[&str], func: &str) -> Result<(), RuntimeError> {
        if self.positional.len() > names.len() {
            return Err(RuntimeError::TypeError(format!(
                "{}() takes at most {} argument{} ({} given)",
                func,
                names.len(),
                if names.len() == 1 { "" } else { "s" },
                self.positional.len()
            )));
        }
        for key in self.keywords.keys() {
            match names.iter().position(|n| n == key) {
                Some(index) if index < self.positional.len() => {
                    return Err(RuntimeError::TypeError(format!(
                        "{}() got multiple values for argument '{}'",
                        func, key
                    )));
                }
                Some(_) => {}
                None => {
                    return Err(RuntimeError::TypeError(format!(
                        "{}() got an unexpected keyword argument '{}'",
                        func, key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn mismatch(func: &str, name: &str, expected: &str, got: &Value) -> RuntimeError {
    RuntimeError::TypeError(format!(
        "{}() argument '{}' must be {}, not {}",
        func,
        name,
        expected,
        got.type_name()
    ))
}

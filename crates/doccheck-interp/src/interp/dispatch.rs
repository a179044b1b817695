// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Attribute lookup, method calls and calling values.

use super::{parse_example_attr, Interpreter, RuntimeError};
use crate::builtins;
use crate::value::{Args, DictKey, Value};

impl<'a> Interpreter<'a> {
    /// `value.name`.
    pub(crate) fn get_attr(&self, value: &Value, name: &str) -> Result<Value, RuntimeError> {
        if let Some(example) = self.lookup_example(value, name) {
            return Ok(example);
        }
        match value {
            Value::Class(class) => {
                if let Some(attr) = class.class_attr(name) {
                    return Ok(attr);
                }
                if class.has_static(name) {
                    return Ok(bound(value, name));
                }
                if name == "__name__" {
                    return Ok(Value::str(class.name()));
                }
            }
            Value::Object(object) => {
                if let Some(attr) = object.get_attr(name) {
                    return Ok(attr);
                }
                if object.has_method(name) {
                    return Ok(bound(value, name));
                }
            }
            Value::Function(function) if name == "__name__" => {
                return Ok(Value::str(function.name()));
            }
            Value::Str(_) | Value::List(_) | Value::Tuple(_) | Value::Dict(_)
                if builtins::has_method(value, name) =>
            {
                return Ok(bound(value, name));
            }
            _ => {}
        }
        Err(no_attribute(value, name))
    }

    /// `receiver.name(args)`.
    pub(crate) fn call_method(&self, receiver: &Value, name: &str, args: Args) -> Result<Value, RuntimeError> {
        match receiver {
            Value::Class(class) if class.has_static(name) => class.call_static(name, args),
            Value::Object(object) if object.has_method(name) => object.call_method(name, args),
            Value::Str(_) | Value::List(_) | Value::Tuple(_) | Value::Dict(_)
                if builtins::has_method(receiver, name) =>
            {
                builtins::call_method(receiver, name, args)
            }
            _ => {
                let callee = self.get_attr(receiver, name)?;
                self.call_value(&callee, args)
            }
        }
    }

    /// `callee(args)`.
    pub(crate) fn call_value(&self, callee: &Value, args: Args) -> Result<Value, RuntimeError> {
        match callee {
            Value::Class(class) => class.construct(args),
            Value::Function(function) => function.call(args),
            Value::Builtin(name) => builtins::call_function(name, args),
            Value::BoundMethod { receiver, method } => self.call_method(receiver, method, args),
            other => Err(RuntimeError::TypeError(format!(
                "'{}' object is not callable",
                other.type_name()
            ))),
        }
    }

    /// `value[index]`.
    pub(crate) fn index(&self, value: &Value, index: &Value) -> Result<Value, RuntimeError> {
        match value {
            Value::List(items) => {
                let items = items.borrow();
                let i = resolve_index(index, items.len(), "list")?;
                Ok(items[i].clone())
            }
            Value::Tuple(items) => {
                let i = resolve_index(index, items.len(), "tuple")?;
                Ok(items[i].clone())
            }
            Value::Str(s) => {
                let len = s.chars().count();
                let i = resolve_index(index, len, "string")?;
                Ok(s.chars().nth(i).map(|c| Value::str(c.to_string())).unwrap_or(Value::None))
            }
            Value::Dict(entries) => {
                let key = DictKey::from_value(index)?;
                entries
                    .borrow()
                    .get(&key)
                    .cloned()
                    .ok_or_else(|| RuntimeError::KeyError(index.repr()))
            }
            Value::Object(object) if object.has_method("__getitem__") => {
                object.call_method("__getitem__", Args::new(vec![index.clone()]))
            }
            other => Err(RuntimeError::TypeError(format!(
                "'{}' object is not subscriptable",
                other.type_name()
            ))),
        }
    }

    fn lookup_example(&self, target: &Value, name: &str) -> Option<Value> {
        if !matches!(target, Value::Class(_) | Value::Function(_)) {
            return None;
        }
        let id = parse_example_attr(name)?;
        self.examples?.example_of(target, id)
    }
}

fn bound(receiver: &Value, name: &str) -> Value {
    Value::BoundMethod {
        receiver: Box::new(receiver.clone()),
        method: name.to_string(),
    }
}

fn no_attribute(value: &Value, name: &str) -> RuntimeError {
    let ty = match value {
        Value::Class(class) => class.name().to_string(),
        other => other.type_name(),
    };
    RuntimeError::AttributeError {
        ty,
        attr: name.to_string(),
    }
}

/// Python-style index: negative counts from the end.
fn resolve_index(index: &Value, len: usize, what: &str) -> Result<usize, RuntimeError> {
    let i = index.as_int().ok_or_else(|| {
        RuntimeError::TypeError(format!(
            "{} indices must be integers, not {}",
            what,
            index.type_name()
        ))
    })?;
    let resolved = if i < 0 { i + len as i64 } else { i };
    if resolved < 0 || resolved >= len as i64 {
        return Err(RuntimeError::IndexError(format!("{} index out of range", what)));
    }
    Ok(resolved as usize)
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Builtin functions and methods on builtin types.

mod collections;
mod strings;

use std::cmp::Ordering;

use indexmap::IndexMap;

use crate::interp::RuntimeError;
use crate::method_names::{methods_for, BUILTIN_FUNCTIONS};
use crate::value::{format_float, Args, DictKey, Value};

/// Builtin function bound to `name`, if any.
pub(crate) fn lookup(name: &str) -> Option<Value> {
    BUILTIN_FUNCTIONS
        .iter()
        .find(|&&n| n == name)
        .map(|&n| Value::Builtin(n))
}

pub(crate) fn has_method(receiver: &Value, name: &str) -> bool {
    methods_for(&receiver.type_name()).contains(&name)
}

pub(crate) fn call_method(receiver: &Value, name: &str, args: Args) -> Result<Value, RuntimeError> {
    match receiver {
        Value::Str(s) => strings::call_method(s, name, args),
        Value::List(_) | Value::Tuple(_) => collections::call_sequence_method(receiver, name, args),
        Value::Dict(entries) => collections::call_dict_method(entries, name, args),
        other => Err(no_method(other, name)),
    }
}

pub(crate) fn no_method(receiver: &Value, name: &str) -> RuntimeError {
    RuntimeError::AttributeError {
        ty: receiver.type_name(),
        attr: name.to_string(),
    }
}

/// Materialize an iterable into its items. Dicts yield their keys.
pub(crate) fn iterate(value: &Value) -> Result<Vec<Value>, RuntimeError> {
    match value {
        Value::List(items) => Ok(items.borrow().clone()),
        Value::Tuple(items) => Ok(items.to_vec()),
        Value::Str(s) => Ok(s.chars().map(|c| Value::str(c.to_string())).collect()),
        Value::Dict(entries) => Ok(entries.borrow().keys().map(DictKey::to_value).collect()),
        other => Err(RuntimeError::TypeError(format!(
            "'{}' object is not iterable",
            other.type_name()
        ))),
    }
}

pub(crate) fn call_function(name: &str, args: Args) -> Result<Value, RuntimeError> {
    match name {
        "len" => {
            args.expect_at_most(&["obj"], name)?;
            len(args.require(0, "obj", name)?)
        }
        "str" => {
            args.expect_at_most(&["object"], name)?;
            Ok(Value::str(args.get(0, "object").map(|v| v.to_string()).unwrap_or_default()))
        }
        "repr" => {
            args.expect_at_most(&["obj"], name)?;
            Ok(Value::str(args.require(0, "obj", name)?.repr()))
        }
        "int" => {
            args.expect_at_most(&["x"], name)?;
            to_int(args.get(0, "x").unwrap_or(&Value::Int(0)))
        }
        "float" => {
            args.expect_at_most(&["x"], name)?;
            to_float(args.get(0, "x").unwrap_or(&Value::Float(0.0)))
        }
        "bool" => {
            args.expect_at_most(&["x"], name)?;
            Ok(Value::Bool(args.get(0, "x").is_some_and(Value::truthy)))
        }
        "abs" => {
            args.expect_at_most(&["x"], name)?;
            match args.require(0, "x", name)? {
                Value::Float(f) => Ok(Value::Float(f.abs())),
                v => match v.as_int() {
                    Some(n) => n
                        .checked_abs()
                        .map(Value::Int)
                        .ok_or_else(|| RuntimeError::Overflow("integer overflow".to_string())),
                    None => Err(bad_argument(name, v)),
                },
            }
        }
        "min" => extreme(name, args, Ordering::Less),
        "max" => extreme(name, args, Ordering::Greater),
        "sum" => {
            args.expect_at_most(&["iterable", "start"], name)?;
            let items = iterate(args.require(0, "iterable", name)?)?;
            let mut total = args.get(1, "start").cloned().unwrap_or(Value::Int(0));
            for item in &items {
                total = crate::interp::add_values(&total, item)?;
            }
            Ok(total)
        }
        "sorted" => {
            args.expect_at_most(&["iterable", "reverse"], name)?;
            let mut items = iterate(args.require(0, "iterable", name)?)?;
            sort_values(&mut items)?;
            if args.get(1, "reverse").is_some_and(Value::truthy) {
                items.reverse();
            }
            Ok(Value::list(items))
        }
        "list" => {
            args.expect_at_most(&["iterable"], name)?;
            match args.get(0, "iterable") {
                Some(v) => Ok(Value::list(iterate(v)?)),
                None => Ok(Value::list(Vec::new())),
            }
        }
        "tuple" => {
            args.expect_at_most(&["iterable"], name)?;
            match args.get(0, "iterable") {
                Some(v) => Ok(Value::tuple(iterate(v)?)),
                None => Ok(Value::tuple(Vec::new())),
            }
        }
        "dict" => collections::build_dict(args),
        "range" => range(args),
        "round" => round(args),
        "isinstance" => {
            args.expect_at_most(&["obj", "class_or_tuple"], name)?;
            let obj = args.require(0, "obj", name)?;
            isinstance(obj, args.require(1, "class_or_tuple", name)?).map(Value::Bool)
        }
        "any" => {
            args.expect_at_most(&["iterable"], name)?;
            let items = iterate(args.require(0, "iterable", name)?)?;
            Ok(Value::Bool(items.iter().any(Value::truthy)))
        }
        "all" => {
            args.expect_at_most(&["iterable"], name)?;
            let items = iterate(args.require(0, "iterable", name)?)?;
            Ok(Value::Bool(items.iter().all(Value::truthy)))
        }
        _ => Err(RuntimeError::NameError(name.to_string())),
    }
}

fn bad_argument(func: &str, value: &Value) -> RuntimeError {
    RuntimeError::TypeError(format!(
        "bad operand type for {}(): '{}'",
        func,
        value.type_name()
    ))
}

fn len(value: &Value) -> Result<Value, RuntimeError> {
    let n = match value {
        Value::Str(s) => s.chars().count(),
        Value::List(items) => items.borrow().len(),
        Value::Tuple(items) => items.len(),
        Value::Dict(entries) => entries.borrow().len(),
        Value::Object(o) if o.has_method("__len__") => {
            return o.call_method("__len__", Args::default());
        }
        other => {
            return Err(RuntimeError::TypeError(format!(
                "object of type '{}' has no len()",
                other.type_name()
            )))
        }
    };
    Ok(Value::Int(n as i64))
}

fn to_int(value: &Value) -> Result<Value, RuntimeError> {
    match value {
        Value::Int(n) => Ok(Value::Int(*n)),
        Value::Bool(b) => Ok(Value::Int(*b as i64)),
        Value::Float(f) => {
            if f.is_nan() {
                return Err(RuntimeError::ValueError("cannot convert float NaN to integer".to_string()));
            }
            let t = f.trunc();
            if t < -9.223_372_036_854_776e18 || t >= 9.223_372_036_854_776e18 {
                return Err(RuntimeError::Overflow(format!(
                    "cannot convert float {} to integer",
                    format_float(*f)
                )));
            }
            Ok(Value::Int(t as i64))
        }
        Value::Str(s) => s
            .trim()
            .replace('_', "")
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| {
                RuntimeError::ValueError(format!(
                    "invalid literal for int() with base 10: {}",
                    value.repr()
                ))
            }),
        other => Err(RuntimeError::TypeError(format!(
            "int() argument must be a string or a number, not '{}'",
            other.type_name()
        ))),
    }
}

fn to_float(value: &Value) -> Result<Value, RuntimeError> {
    match value {
        Value::Str(s) => {
            let text = s.trim().to_ascii_lowercase();
            let parsed = match text.as_str() {
                "inf" | "+inf" | "infinity" => Some(f64::INFINITY),
                "-inf" | "-infinity" => Some(f64::NEG_INFINITY),
                "nan" => Some(f64::NAN),
                _ => text.parse::<f64>().ok(),
            };
            parsed.map(Value::Float).ok_or_else(|| {
                RuntimeError::ValueError(format!(
                    "could not convert string to float: {}",
                    value.repr()
                ))
            })
        }
        other => other.as_float().map(Value::Float).ok_or_else(|| {
            RuntimeError::TypeError(format!(
                "float() argument must be a string or a number, not '{}'",
                other.type_name()
            ))
        }),
    }
}

/// Stable sort by `py_cmp`; incomparable items raise `TypeError`.
pub(crate) fn sort_values(items: &mut [Value]) -> Result<(), RuntimeError> {
    let mut failure = None;
    items.sort_by(|a, b| match a.py_cmp(b) {
        Some(ord) => ord,
        None => {
            failure.get_or_insert_with(|| {
                RuntimeError::TypeError(format!(
                    "'<' not supported between instances of '{}' and '{}'",
                    a.type_name(),
                    b.type_name()
                ))
            });
            Ordering::Equal
        }
    });
    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// `min`/`max`: one iterable argument, or two or more positional values.
fn extreme(name: &str, args: Args, keep: Ordering) -> Result<Value, RuntimeError> {
    let items = match args.positional() {
        [] => return Err(RuntimeError::TypeError(format!("{} expected at least 1 argument, got 0", name))),
        [single] => iterate(single)?,
        many => many.to_vec(),
    };
    let default = args.keywords().get("default").cloned();
    let mut iter = items.into_iter();
    let Some(mut best) = iter.next() else {
        return default.ok_or_else(|| {
            RuntimeError::ValueError(format!("{}() arg is an empty sequence", name))
        });
    };
    for item in iter {
        match item.py_cmp(&best) {
            Some(ord) if ord == keep => best = item,
            Some(_) => {}
            None => {
                return Err(RuntimeError::TypeError(format!(
                    "'{}' not supported between instances of '{}' and '{}'",
                    if keep == Ordering::Less { "<" } else { ">" },
                    item.type_name(),
                    best.type_name()
                )))
            }
        }
    }
    Ok(best)
}

const MAX_RANGE: i64 = 10_000_000;

fn range(args: Args) -> Result<Value, RuntimeError> {
    args.expect_at_most(&["start", "stop", "step"], "range")?;
    let (start, stop, step) = match args.len() {
        1 => (0, args.int(0, "stop", "range")?, 1),
        2 => (args.int(0, "start", "range")?, args.int(1, "stop", "range")?, 1),
        3 => (
            args.int(0, "start", "range")?,
            args.int(1, "stop", "range")?,
            args.int(2, "step", "range")?,
        ),
        n => {
            return Err(RuntimeError::TypeError(format!(
                "range expected at least 1 argument, got {}",
                n
            )))
        }
    };
    if step == 0 {
        return Err(RuntimeError::ValueError("range() arg 3 must not be zero".to_string()));
    }
    let span = if step > 0 { stop.saturating_sub(start) } else { start.saturating_sub(stop) };
    let count = if span <= 0 { 0 } else { (span - 1) / step.saturating_abs() + 1 };
    if count > MAX_RANGE {
        return Err(RuntimeError::Overflow(format!("range of {} items is too large", count)));
    }
    let items = (0..count).map(|i| Value::Int(start + i * step)).collect();
    Ok(Value::list(items))
}

fn round(args: Args) -> Result<Value, RuntimeError> {
    args.expect_at_most(&["number", "ndigits"], "round")?;
    let number = args.require(0, "number", "round")?;
    let ndigits = match args.get(1, "ndigits") {
        None | Some(Value::None) => None,
        Some(_) => Some(args.int(1, "ndigits", "round")?),
    };
    match (number, ndigits) {
        (Value::Float(f), None) => to_int(&Value::Float(f.round_ties_even())),
        (Value::Float(f), Some(n)) => {
            let exp = i32::try_from(n.clamp(-308, 308)).unwrap_or(0);
            let factor = 10f64.powi(exp);
            Ok(Value::Float((f * factor).round_ties_even() / factor))
        }
        (v, _) => match v.as_int() {
            Some(n) => Ok(Value::Int(n)),
            None => Err(RuntimeError::TypeError(format!(
                "type {} doesn't define __round__ method",
                v.type_name()
            ))),
        },
    }
}

fn isinstance(obj: &Value, class: &Value) -> Result<bool, RuntimeError> {
    match class {
        Value::Class(c) => Ok(matches!(obj, Value::Object(o) if o.type_name() == c.name())),
        Value::Builtin(name) => Ok(match *name {
            "int" => matches!(obj, Value::Int(_) | Value::Bool(_)),
            "float" => matches!(obj, Value::Float(_)),
            "bool" => matches!(obj, Value::Bool(_)),
            "str" => matches!(obj, Value::Str(_)),
            "list" => matches!(obj, Value::List(_)),
            "tuple" => matches!(obj, Value::Tuple(_)),
            "dict" => matches!(obj, Value::Dict(_)),
            other => {
                return Err(RuntimeError::TypeError(format!(
                    "isinstance() arg 2 must be a type, not builtin {}",
                    other
                )))
            }
        }),
        Value::Tuple(options) => {
            for option in options.iter() {
                if isinstance(obj, option)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        other => Err(RuntimeError::TypeError(format!(
            "isinstance() arg 2 must be a type or tuple of types, not {}",
            other.type_name()
        ))),
    }
}

/// Entries from `key=value` keywords, kept in call order.
pub(crate) fn keyword_entries(args: &Args) -> IndexMap<DictKey, Value> {
    args.keywords()
        .iter()
        .map(|(k, v)| (DictKey::Str(k.as_str().into()), v.clone()))
        .collect()
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! List, tuple and dict methods, and the `dict()` builtin.

use std::cell::RefCell;

use indexmap::IndexMap;

use super::{iterate, keyword_entries, no_method};
use crate::interp::RuntimeError;
use crate::value::{Args, DictKey, Value};

pub(super) fn call_sequence_method(receiver: &Value, method: &str, args: Args) -> Result<Value, RuntimeError> {
    let items: Vec<Value> = iterate(receiver)?;
    match method {
        "count" => {
            args.expect_at_most(&["value"], method)?;
            let needle = args.require(0, "value", method)?;
            Ok(Value::Int(items.iter().filter(|v| v.py_eq(needle)).count() as i64))
        }
        "index" => {
            args.expect_at_most(&["value"], method)?;
            let needle = args.require(0, "value", method)?;
            items
                .iter()
                .position(|v| v.py_eq(needle))
                .map(|i| Value::Int(i as i64))
                .ok_or_else(|| {
                    RuntimeError::ValueError(format!(
                        "{} is not in {}",
                        needle.repr(),
                        receiver.type_name()
                    ))
                })
        }
        "copy" if matches!(receiver, Value::List(_)) => {
            args.expect_at_most(&[], method)?;
            Ok(Value::list(items))
        }
        "append" => match receiver {
            Value::List(list) => {
                args.expect_at_most(&["object"], method)?;
                let item = args.require(0, "object", method)?.clone();
                list.borrow_mut().push(item);
                Ok(Value::None)
            }
            _ => Err(no_method(receiver, method)),
        },
        _ => Err(no_method(receiver, method)),
    }
}

pub(super) fn call_dict_method(
    entries: &RefCell<IndexMap<DictKey, Value>>,
    method: &str,
    args: Args,
) -> Result<Value, RuntimeError> {
    let entries = entries.borrow();
    match method {
        "get" => {
            args.expect_at_most(&["key", "default"], method)?;
            let key = DictKey::from_value(args.require(0, "key", method)?)?;
            let default = args.get(1, "default").cloned().unwrap_or(Value::None);
            Ok(entries.get(&key).cloned().unwrap_or(default))
        }
        "keys" => {
            args.expect_at_most(&[], method)?;
            Ok(Value::list(entries.keys().map(DictKey::to_value).collect()))
        }
        "values" => {
            args.expect_at_most(&[], method)?;
            Ok(Value::list(entries.values().cloned().collect()))
        }
        "items" => {
            args.expect_at_most(&[], method)?;
            Ok(Value::list(
                entries
                    .iter()
                    .map(|(k, v)| Value::tuple(vec![k.to_value(), v.clone()]))
                    .collect(),
            ))
        }
        _ => Err(RuntimeError::AttributeError {
            ty: "dict".to_string(),
            attr: method.to_string(),
        }),
    }
}

/// `dict()`, `dict(mapping_or_pairs)`, `dict(**kwargs)`.
pub(super) fn build_dict(args: Args) -> Result<Value, RuntimeError> {
    if args.len() > 1 {
        return Err(RuntimeError::TypeError(format!(
            "dict expected at most 1 argument, got {}",
            args.len()
        )));
    }
    let mut map = IndexMap::new();
    match args.positional().first() {
        None => {}
        Some(Value::Dict(source)) => {
            map.extend(source.borrow().iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        Some(iterable) => {
            for (i, pair) in iterate(iterable)?.iter().enumerate() {
                let items = match pair {
                    Value::List(_) | Value::Tuple(_) => iterate(pair)?,
                    other => {
                        return Err(RuntimeError::TypeError(format!(
                            "cannot convert dictionary update sequence element #{} ({}) to a sequence",
                            i,
                            other.type_name()
                        )))
                    }
                };
                let [key, value] = items.as_slice() else {
                    return Err(RuntimeError::ValueError(format!(
                        "dictionary update sequence element #{} has length {}; 2 is required",
                        i,
                        items.len()
                    )));
                };
                map.insert(DictKey::from_value(key)?, value.clone());
            }
        }
    }
    map.extend(keyword_entries(&args));
    Ok(Value::dict(map))
}

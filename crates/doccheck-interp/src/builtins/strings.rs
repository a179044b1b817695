// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! String methods.

use std::rc::Rc;

use super::{iterate, no_method};
use crate::interp::RuntimeError;
use crate::value::{Args, Value};

pub(super) fn call_method(s: &Rc<str>, method: &str, args: Args) -> Result<Value, RuntimeError> {
    match method {
        "upper" => {
            args.expect_at_most(&[], method)?;
            Ok(Value::str(s.to_uppercase()))
        }
        "lower" => {
            args.expect_at_most(&[], method)?;
            Ok(Value::str(s.to_lowercase()))
        }
        "strip" | "lstrip" | "rstrip" => {
            args.expect_at_most(&["chars"], method)?;
            let chars = args.string_or_none(0, "chars", method)?;
            Ok(Value::str(strip(s, method, chars.as_deref())))
        }
        "split" => {
            args.expect_at_most(&["sep", "maxsplit"], method)?;
            let sep = args.string_or_none(0, "sep", method)?;
            let maxsplit = match args.get(1, "maxsplit") {
                Some(_) => args.int(1, "maxsplit", method)?,
                None => -1,
            };
            split(s, sep.as_deref(), maxsplit)
        }
        "join" => {
            args.expect_at_most(&["iterable"], method)?;
            let items = iterate(args.require(0, "iterable", method)?)?;
            let mut parts = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                match item {
                    Value::Str(part) => parts.push(part.to_string()),
                    other => {
                        return Err(RuntimeError::TypeError(format!(
                            "sequence item {}: expected str instance, {} found",
                            i,
                            other.type_name()
                        )))
                    }
                }
            }
            Ok(Value::str(parts.join(&**s)))
        }
        "startswith" | "endswith" => {
            args.expect_at_most(&["prefix"], method)?;
            let candidates = match args.require(0, "prefix", method)? {
                Value::Str(p) => vec![p.clone()],
                Value::Tuple(options) => options
                    .iter()
                    .map(|o| match o {
                        Value::Str(p) => Ok(p.clone()),
                        other => Err(RuntimeError::TypeError(format!(
                            "tuple for {} must only contain str, not {}",
                            method,
                            other.type_name()
                        ))),
                    })
                    .collect::<Result<Vec<_>, _>>()?,
                other => {
                    return Err(RuntimeError::TypeError(format!(
                        "{} first arg must be str or a tuple of str, not {}",
                        method,
                        other.type_name()
                    )))
                }
            };
            let hit = candidates.iter().any(|p| {
                if method == "startswith" {
                    s.starts_with(&**p)
                } else {
                    s.ends_with(&**p)
                }
            });
            Ok(Value::Bool(hit))
        }
        "replace" => {
            args.expect_at_most(&["old", "new", "count"], method)?;
            let old = args.string(0, "old", method)?;
            let new = args.string(1, "new", method)?;
            let count = match args.get(2, "count") {
                Some(_) => args.int(2, "count", method)?,
                None => -1,
            };
            let replaced = if count < 0 {
                s.replace(&*old, &new)
            } else {
                s.replacen(&*old, &new, count as usize)
            };
            Ok(Value::str(replaced))
        }
        "find" => {
            args.expect_at_most(&["sub"], method)?;
            let sub = args.string(0, "sub", method)?;
            let index = s
                .find(&*sub)
                .map(|byte| s[..byte].chars().count() as i64)
                .unwrap_or(-1);
            Ok(Value::Int(index))
        }
        "count" => {
            args.expect_at_most(&["sub"], method)?;
            let sub = args.string(0, "sub", method)?;
            let n = if sub.is_empty() {
                s.chars().count() + 1
            } else {
                s.matches(&*sub).count()
            };
            Ok(Value::Int(n as i64))
        }
        "format" => format(s, &args).map(Value::str),
        _ => Err(no_method(&Value::Str(s.clone()), method)),
    }
}

fn strip(s: &str, method: &str, chars: Option<&str>) -> String {
    let matches = |c: char| match chars {
        Some(set) => set.contains(c),
        None => c.is_whitespace(),
    };
    match method {
        "lstrip" => s.trim_start_matches(matches).to_string(),
        "rstrip" => s.trim_end_matches(matches).to_string(),
        _ => s.trim_matches(matches).to_string(),
    }
}

fn split(s: &str, sep: Option<&str>, maxsplit: i64) -> Result<Value, RuntimeError> {
    let limit = usize::try_from(maxsplit).ok();
    let parts: Vec<Value> = match sep {
        Some("") => return Err(RuntimeError::ValueError("empty separator".to_string())),
        Some(sep) => match limit {
            Some(n) => s.splitn(n + 1, sep).map(Value::str).collect(),
            None => s.split(sep).map(Value::str).collect(),
        },
        None => {
            let mut parts = Vec::new();
            let mut rest = s.trim_start();
            while !rest.is_empty() {
                if limit.is_some_and(|n| parts.len() == n) {
                    parts.push(Value::str(rest.trim_end()));
                    break;
                }
                let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
                parts.push(Value::str(&rest[..end]));
                rest = rest[end..].trim_start();
            }
            parts
        }
    };
    Ok(Value::list(parts))
}

/// `str.format`: `{}`, `{0}`, `{name}`, and `{{`/`}}` escapes.
fn format(template: &str, args: &Args) -> Result<String, RuntimeError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut auto_index = 0usize;
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut field = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => field.push(ch),
                        None => {
                            return Err(RuntimeError::ValueError(
                                "expected '}' before end of string".to_string(),
                            ))
                        }
                    }
                }
                if field.contains(':') || field.contains('!') {
                    return Err(RuntimeError::ValueError(format!(
                        "unsupported format field '{{{}}}'",
                        field
                    )));
                }
                let value = if field.is_empty() {
                    let value = args.positional().get(auto_index);
                    auto_index += 1;
                    value
                } else if let Ok(index) = field.parse::<usize>() {
                    args.positional().get(index)
                } else {
                    args.keywords().get(&field)
                };
                match value {
                    Some(v) => out.push_str(&v.to_string()),
                    None if field.is_empty() || field.parse::<usize>().is_ok() => {
                        return Err(RuntimeError::IndexError(
                            "replacement index out of range for positional args".to_string(),
                        ))
                    }
                    None => return Err(RuntimeError::KeyError(format!("'{}'", field))),
                }
            }
            '}' => {
                return Err(RuntimeError::ValueError(
                    "single '}' encountered in format string".to_string(),
                ))
            }
            c => out.push(c),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;

    fn call(s: &str, method: &str, positional: Vec<Value>) -> Result<Value, RuntimeError> {
        call_method(&Rc::from(s), method, Args::new(positional))
    }

    fn strs(items: &[&str]) -> Value {
        Value::list(items.iter().map(|s| Value::str(*s)).collect())
    }

    #[test]
    fn case_and_strip() {
        assert!(call("Ab", "upper", vec![]).unwrap().py_eq(&Value::str("AB")));
        assert!(call("  x ", "strip", vec![]).unwrap().py_eq(&Value::str("x")));
        assert!(call("xxhixx", "lstrip", vec![Value::str("x")]).unwrap().py_eq(&Value::str("hixx")));
        assert!(call("hi..", "rstrip", vec![Value::str(".")]).unwrap().py_eq(&Value::str("hi")));
    }

    #[test]
    fn split_variants() {
        assert!(call(" a  b c ", "split", vec![]).unwrap().py_eq(&strs(&["a", "b", "c"])));
        assert!(call("a,b,,c", "split", vec![Value::str(",")])
            .unwrap()
            .py_eq(&strs(&["a", "b", "", "c"])));
        assert!(call("a b c", "split", vec![Value::None, Value::Int(1)])
            .unwrap()
            .py_eq(&strs(&["a", "b c"])));
        assert!(call("a", "split", vec![Value::str("")]).is_err());
    }

    #[test]
    fn join_requires_strings() {
        assert!(call("-", "join", vec![strs(&["a", "b"])]).unwrap().py_eq(&Value::str("a-b")));
        assert!(call("-", "join", vec![Value::list(vec![Value::Int(1)])]).is_err());
    }

    #[test]
    fn find_count_replace() {
        assert!(call("héllo", "find", vec![Value::str("l")]).unwrap().py_eq(&Value::Int(2)));
        assert!(call("abc", "find", vec![Value::str("z")]).unwrap().py_eq(&Value::Int(-1)));
        assert!(call("banana", "count", vec![Value::str("an")]).unwrap().py_eq(&Value::Int(2)));
        assert!(call("aaa", "replace", vec![Value::str("a"), Value::str("b"), Value::Int(2)])
            .unwrap()
            .py_eq(&Value::str("bba")));
    }

    #[test]
    fn prefix_checks_accept_tuples() {
        let options = Value::tuple(vec![Value::str("x"), Value::str("he")]);
        assert!(call("hello", "startswith", vec![options]).unwrap().truthy());
        assert!(call("hello", "endswith", vec![Value::str("lo")]).unwrap().truthy());
    }

    #[test]
    fn format_fields() {
        let mut kw = IndexMap::new();
        kw.insert("name".to_string(), Value::str("x"));
        let args = Args::with_keywords(vec![Value::Int(1), Value::Float(2.5)], kw);
        let out = format("{}-{}-{name}-{0}-{{}}", &args).unwrap();
        assert_eq!(out, "1-2.5-x-1-{}");
        assert!(format("{5}", &args).is_err());
        assert!(format("{missing}", &args).is_err());
        assert!(format("{:>3}", &args).is_err());
    }
}

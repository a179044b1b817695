// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Arithmetic, unary and comparison operators.

use doccheck_ast::expr::{BinOp, CmpOp, UnaryOp};

use super::RuntimeError;
use crate::value::{Args, DictKey, Num, Value};

fn unsupported(op: &str, l: &Value, r: &Value) -> RuntimeError {
    RuntimeError::TypeError(format!(
        "unsupported operand type(s) for {}: '{}' and '{}'",
        op,
        l.type_name(),
        r.type_name()
    ))
}

fn overflow() -> RuntimeError {
    RuntimeError::Overflow("integer overflow".to_string())
}

pub(crate) fn binary(op: BinOp, l: &Value, r: &Value) -> Result<Value, RuntimeError> {
    match op {
        BinOp::Add => add(l, r),
        BinOp::Sub => arith(op, l, r, i64::checked_sub, |a, b| a - b),
        BinOp::Mul => mul(l, r),
        BinOp::Div => {
            let (a, b) = numbers(op, l, r)?;
            if b.to_f64() == 0.0 {
                return Err(RuntimeError::ZeroDivision);
            }
            Ok(Value::Float(a.to_f64() / b.to_f64()))
        }
        BinOp::FloorDiv => match numbers(op, l, r)? {
            (Num::Int(_), Num::Int(0)) => Err(RuntimeError::ZeroDivision),
            (Num::Int(a), Num::Int(b)) => floor_div(a, b).map(Value::Int).ok_or_else(overflow),
            (a, b) => {
                let (a, b) = (a.to_f64(), b.to_f64());
                if b == 0.0 {
                    return Err(RuntimeError::ZeroDivision);
                }
                Ok(Value::Float((a / b).floor()))
            }
        },
        BinOp::Mod => match numbers(op, l, r)? {
            (Num::Int(_), Num::Int(0)) => Err(RuntimeError::ZeroDivision),
            (Num::Int(a), Num::Int(b)) => {
                let m = a.checked_rem(b).ok_or_else(overflow)?;
                Ok(Value::Int(if m != 0 && (m < 0) != (b < 0) { m + b } else { m }))
            }
            (a, b) => {
                let (a, b) = (a.to_f64(), b.to_f64());
                if b == 0.0 {
                    return Err(RuntimeError::ZeroDivision);
                }
                let m = a % b;
                Ok(Value::Float(if m != 0.0 && (m < 0.0) != (b < 0.0) { m + b } else { m }))
            }
        },
        BinOp::Pow => pow(l, r),
        BinOp::And | BinOp::Or => Err(RuntimeError::TypeError(format!(
            "'{}' is evaluated lazily",
            op.symbol()
        ))),
    }
}

fn numbers(op: BinOp, l: &Value, r: &Value) -> Result<(Num, Num), RuntimeError> {
    match (l.as_number(), r.as_number()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(unsupported(op.symbol(), l, r)),
    }
}

fn arith(
    op: BinOp,
    l: &Value,
    r: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, RuntimeError> {
    match numbers(op, l, r)? {
        (Num::Int(a), Num::Int(b)) => int_op(a, b).map(Value::Int).ok_or_else(overflow),
        (a, b) => Ok(Value::Float(float_op(a.to_f64(), b.to_f64()))),
    }
}

fn add(l: &Value, r: &Value) -> Result<Value, RuntimeError> {
    match (l, r) {
        (Value::Str(a), Value::Str(b)) => Ok(Value::str(format!("{}{}", a, b))),
        (Value::List(a), Value::List(b)) => {
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            Ok(Value::list(items))
        }
        (Value::Tuple(a), Value::Tuple(b)) => {
            Ok(Value::tuple(a.iter().chain(b.iter()).cloned().collect()))
        }
        _ => arith(BinOp::Add, l, r, i64::checked_add, |a, b| a + b),
    }
}

fn mul(l: &Value, r: &Value) -> Result<Value, RuntimeError> {
    match (l, r) {
        (Value::Str(s), n) | (n, Value::Str(s)) if n.as_int().is_some() => {
            let times = repeat_count(s.len(), n)?;
            Ok(Value::str(s.repeat(times)))
        }
        (Value::List(items), n) | (n, Value::List(items)) if n.as_int().is_some() => {
            let items = items.borrow();
            let times = repeat_count(items.len(), n)?;
            Ok(Value::list(items.iter().cloned().cycle().take(items.len() * times).collect()))
        }
        (Value::Tuple(items), n) | (n, Value::Tuple(items)) if n.as_int().is_some() => {
            let times = repeat_count(items.len(), n)?;
            Ok(Value::tuple(items.iter().cloned().cycle().take(items.len() * times).collect()))
        }
        _ => arith(BinOp::Mul, l, r, i64::checked_mul, |a, b| a * b),
    }
}

/// Largest sequence a repetition may build, in items (bytes for strings).
const MAX_REPEAT_LEN: usize = 10_000_000;

/// Repetition count for a sequence of `len` items; `len * count` is checked
/// against [`MAX_REPEAT_LEN`].
fn repeat_count(len: usize, n: &Value) -> Result<usize, RuntimeError> {
    let n = n.as_int().unwrap_or(0).max(0);
    let times = usize::try_from(n).map_err(|_| overflow())?;
    match len.checked_mul(times) {
        Some(total) if total <= MAX_REPEAT_LEN => Ok(times),
        _ => Err(RuntimeError::Overflow(format!(
            "repeated sequence of {} items by {} is too large",
            len, n
        ))),
    }
}

fn floor_div(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        Some(q - 1)
    } else {
        Some(q)
    }
}

fn pow(l: &Value, r: &Value) -> Result<Value, RuntimeError> {
    match numbers(BinOp::Pow, l, r)? {
        (Num::Int(base), Num::Int(exp)) if exp >= 0 => {
            let exp = u32::try_from(exp).map_err(|_| overflow())?;
            base.checked_pow(exp).map(Value::Int).ok_or_else(overflow)
        }
        (base, exp) => {
            let (base, exp) = (base.to_f64(), exp.to_f64());
            if base == 0.0 && exp < 0.0 {
                return Err(RuntimeError::ZeroDivision);
            }
            Ok(Value::Float(base.powf(exp)))
        }
    }
}

pub(crate) fn unary(op: UnaryOp, v: &Value) -> Result<Value, RuntimeError> {
    match op {
        UnaryOp::Not => Ok(Value::Bool(!v.truthy())),
        UnaryOp::Neg => match v.as_number() {
            Some(Num::Int(n)) => n.checked_neg().map(Value::Int).ok_or_else(overflow),
            Some(Num::Float(f)) => Ok(Value::Float(-f)),
            None => Err(bad_operand("-", v)),
        },
        UnaryOp::Pos => match v.as_number() {
            Some(Num::Int(n)) => Ok(Value::Int(n)),
            Some(Num::Float(f)) => Ok(Value::Float(f)),
            None => Err(bad_operand("+", v)),
        },
    }
}

fn bad_operand(op: &str, v: &Value) -> RuntimeError {
    RuntimeError::TypeError(format!("bad operand type for unary {}: '{}'", op, v.type_name()))
}

pub(crate) fn compare(op: CmpOp, l: &Value, r: &Value) -> Result<bool, RuntimeError> {
    use std::cmp::Ordering::*;
    let ordered = |accept: &[std::cmp::Ordering]| match l.py_cmp(r) {
        Some(ord) => Ok(accept.contains(&ord)),
        None => Err(RuntimeError::TypeError(format!(
            "'{}' not supported between instances of '{}' and '{}'",
            op.symbol(),
            l.type_name(),
            r.type_name()
        ))),
    };
    match op {
        CmpOp::Eq => Ok(l.py_eq(r)),
        CmpOp::Ne => Ok(!l.py_eq(r)),
        CmpOp::Lt => ordered(&[Less]),
        CmpOp::Le => ordered(&[Less, Equal]),
        CmpOp::Gt => ordered(&[Greater]),
        CmpOp::Ge => ordered(&[Greater, Equal]),
        CmpOp::In => contains(r, l),
        CmpOp::NotIn => contains(r, l).map(|found| !found),
        CmpOp::Is => Ok(l.is_same(r)),
        CmpOp::IsNot => Ok(!l.is_same(r)),
    }
}

/// Membership test (`item in container`).
pub(crate) fn contains(container: &Value, item: &Value) -> Result<bool, RuntimeError> {
    match container {
        Value::List(items) => Ok(items.borrow().iter().any(|v| v.py_eq(item))),
        Value::Tuple(items) => Ok(items.iter().any(|v| v.py_eq(item))),
        Value::Str(s) => match item {
            Value::Str(needle) => Ok(s.contains(&**needle)),
            other => Err(RuntimeError::TypeError(format!(
                "'in <string>' requires string as left operand, not {}",
                other.type_name()
            ))),
        },
        Value::Dict(entries) => {
            let key = DictKey::from_value(item)?;
            Ok(entries.borrow().contains_key(&key))
        }
        Value::Object(o) if o.has_method("__contains__") => {
            let found = o.call_method("__contains__", Args::new(vec![item.clone()]))?;
            Ok(found.truthy())
        }
        other => Err(RuntimeError::TypeError(format!(
            "argument of type '{}' is not iterable",
            other.type_name()
        ))),
    }
}

/// Concatenation helper shared with `sum()`.
pub(crate) fn add_values(l: &Value, r: &Value) -> Result<Value, RuntimeError> {
    add(l, r)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(n: i64) -> Value {
        Value::Int(n)
    }

    #[test]
    fn floor_division_and_modulo_follow_divisor_sign() {
        assert!(binary(BinOp::FloorDiv, &int(7), &int(2)).unwrap().py_eq(&int(3)));
        assert!(binary(BinOp::FloorDiv, &int(-7), &int(2)).unwrap().py_eq(&int(-4)));
        assert!(binary(BinOp::Mod, &int(-7), &int(2)).unwrap().py_eq(&int(1)));
        assert!(binary(BinOp::Mod, &int(7), &int(-2)).unwrap().py_eq(&int(-1)));
        assert!(binary(BinOp::Mod, &Value::Float(-1.5), &int(1))
            .unwrap()
            .py_eq(&Value::Float(0.5)));
    }

    #[test]
    fn true_division_always_floats() {
        let v = binary(BinOp::Div, &int(10), &int(4)).unwrap();
        assert!(matches!(v, Value::Float(f) if f == 2.5));
        assert!(matches!(binary(BinOp::Div, &int(10), &int(0)), Err(RuntimeError::ZeroDivision)));
        assert!(matches!(
            binary(BinOp::Div, &Value::Float(1.0), &Value::Float(0.0)),
            Err(RuntimeError::ZeroDivision)
        ));
    }

    #[test]
    fn integer_overflow_is_an_error() {
        let err = binary(BinOp::Add, &int(i64::MAX), &int(1)).unwrap_err();
        assert_eq!(err.kind(), "OverflowError");
        assert!(binary(BinOp::Pow, &int(2), &int(64)).is_err());
        assert!(unary(UnaryOp::Neg, &int(i64::MIN)).is_err());
    }

    #[test]
    fn negative_exponent_yields_float() {
        let v = binary(BinOp::Pow, &int(2), &int(-1)).unwrap();
        assert!(v.py_eq(&Value::Float(0.5)));
        assert!(binary(BinOp::Pow, &int(0), &int(-1)).is_err());
    }

    #[test]
    fn sequence_repetition_and_concatenation() {
        let s = binary(BinOp::Mul, &Value::str("ab"), &int(3)).unwrap();
        assert!(s.py_eq(&Value::str("ababab")));
        let l = binary(BinOp::Mul, &int(2), &Value::list(vec![int(1)])).unwrap();
        assert!(l.py_eq(&Value::list(vec![int(1), int(1)])));
        let t = binary(BinOp::Add, &Value::tuple(vec![int(1)]), &Value::tuple(vec![int(2)])).unwrap();
        assert!(t.py_eq(&Value::tuple(vec![int(1), int(2)])));
    }

    #[test]
    fn oversized_repetition_is_an_overflow_error() {
        let huge = int(9_000_000_000_000_000_000);
        let list = Value::list(vec![int(1), int(2), int(3)]);
        let err = binary(BinOp::Mul, &list, &huge).unwrap_err();
        assert_eq!(err.kind(), "OverflowError");
        let err = binary(BinOp::Mul, &Value::str("abc"), &huge).unwrap_err();
        assert_eq!(err.kind(), "OverflowError");
        let err = binary(BinOp::Mul, &huge, &Value::tuple(vec![int(1)])).unwrap_err();
        assert_eq!(err.kind(), "OverflowError");
        let empty = binary(BinOp::Mul, &Value::list(vec![]), &huge).unwrap();
        assert!(empty.py_eq(&Value::list(vec![])));
        let neg = binary(BinOp::Mul, &Value::str("ab"), &int(-3)).unwrap();
        assert!(neg.py_eq(&Value::str("")));
    }

    #[test]
    fn ordering_across_types_raises() {
        let err = compare(CmpOp::Lt, &int(1), &Value::str("a")).unwrap_err();
        assert_eq!(err.kind(), "TypeError");
        assert!(compare(CmpOp::Eq, &int(1), &Value::str("a")).is_ok());
    }

    #[test]
    fn membership() {
        assert!(contains(&Value::str("hello"), &Value::str("ell")).unwrap());
        assert!(contains(&Value::str("hello"), &int(1)).is_err());
        assert!(contains(&int(3), &int(1)).is_err());
    }
}

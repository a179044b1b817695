// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression evaluation.

use indexmap::IndexMap;

use doccheck_ast::expr::{Arg, BinOp, Expr, ExprKind};

use super::{operators, Interpreter, RuntimeError};
use crate::env::Scope;
use crate::value::{Args, DictKey, Value};

impl<'a> Interpreter<'a> {
    pub(super) fn eval_expr(&self, expr: &Expr, scope: &Scope) -> Result<Value, RuntimeError> {
        match &expr.kind {
            ExprKind::Int(n) => Ok(Value::Int(*n)),
            ExprKind::Float(f) => Ok(Value::Float(*f)),
            ExprKind::String(s) => Ok(Value::str(s.as_str())),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::None => Ok(Value::None),
            ExprKind::Ident(name) => scope
                .get(name)
                .ok_or_else(|| RuntimeError::NameError(name.clone())),
            ExprKind::Binary { op: BinOp::And, left, right } => {
                let l = self.eval_expr(left, scope)?;
                if !l.truthy() {
                    return Ok(l);
                }
                self.eval_expr(right, scope)
            }
            ExprKind::Binary { op: BinOp::Or, left, right } => {
                let l = self.eval_expr(left, scope)?;
                if l.truthy() {
                    return Ok(l);
                }
                self.eval_expr(right, scope)
            }
            ExprKind::Binary { op, left, right } => {
                let l = self.eval_expr(left, scope)?;
                let r = self.eval_expr(right, scope)?;
                operators::binary(*op, &l, &r)
            }
            ExprKind::Unary { op, operand } => {
                let v = self.eval_expr(operand, scope)?;
                operators::unary(*op, &v)
            }
            ExprKind::Compare { first, rest } => {
                let mut left = self.eval_expr(first, scope)?;
                for (op, operand) in rest {
                    let right = self.eval_expr(operand, scope)?;
                    if !operators::compare(*op, &left, &right)? {
                        return Ok(Value::Bool(false));
                    }
                    left = right;
                }
                Ok(Value::Bool(true))
            }
            ExprKind::Call { func, args } => {
                let callee = self.eval_expr(func, scope)?;
                let args = self.eval_args(args, scope)?;
                self.call_value(&callee, args)
            }
            ExprKind::MethodCall { object, method, args } => {
                let receiver = self.eval_expr(object, scope)?;
                let args = self.eval_args(args, scope)?;
                self.call_method(&receiver, method, args)
            }
            ExprKind::Field { object, field } => {
                let value = self.eval_expr(object, scope)?;
                self.get_attr(&value, field)
            }
            ExprKind::Index { object, index } => {
                let value = self.eval_expr(object, scope)?;
                let index = self.eval_expr(index, scope)?;
                self.index(&value, &index)
            }
            ExprKind::List(items) => Ok(Value::list(self.eval_all(items, scope)?)),
            ExprKind::Tuple(items) => Ok(Value::tuple(self.eval_all(items, scope)?)),
            ExprKind::Dict(entries) => {
                let mut map = IndexMap::with_capacity(entries.len());
                for (k, v) in entries {
                    let key = DictKey::from_value(&self.eval_expr(k, scope)?)?;
                    let value = self.eval_expr(v, scope)?;
                    map.insert(key, value);
                }
                Ok(Value::dict(map))
            }
            ExprKind::Conditional { cond, then_branch, else_branch } => {
                if self.eval_expr(cond, scope)?.truthy() {
                    self.eval_expr(then_branch, scope)
                } else {
                    self.eval_expr(else_branch, scope)
                }
            }
        }
    }

    fn eval_all(&self, items: &[Expr], scope: &Scope) -> Result<Vec<Value>, RuntimeError> {
        items.iter().map(|e| self.eval_expr(e, scope)).collect()
    }

    fn eval_args(&self, args: &[Arg], scope: &Scope) -> Result<Args, RuntimeError> {
        let mut positional = Vec::new();
        let mut keywords = IndexMap::new();
        for arg in args {
            let value = self.eval_expr(&arg.value, scope)?;
            match &arg.name {
                Some(name) => {
                    if keywords.insert(name.clone(), value).is_some() {
                        return Err(RuntimeError::TypeError(format!(
                            "keyword argument repeated: {}",
                            name
                        )));
                    }
                }
                None => positional.push(value),
            }
        }
        Ok(Args::with_keywords(positional, keywords))
    }
}

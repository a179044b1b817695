// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The evaluator.
//!
//! Split across files:
//! - `eval_expr.rs`: expression evaluation
//! - `operators.rs`: arithmetic and comparison
//! - `dispatch.rs`: attribute lookup, method calls, calling values

mod dispatch;
mod eval_expr;
mod operators;

pub(crate) use operators::add_values;

use doccheck_ast::expr::Expr;
use doccheck_parser::{parse_expression, SyntaxError};

use crate::env::Scope;
use crate::value::Value;

/// Where built example values live.
///
/// `<Declaration>.example<N>` consults this before the host's own attributes.
/// Targets are matched by identity.
pub trait ExampleSource {
    fn example_of(&self, target: &Value, id: u64) -> Option<Value>;
}

/// Parses `example<digits>` attribute names.
pub fn parse_example_attr(name: &str) -> Option<u64> {
    let digits = name.strip_prefix("example")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// The payload evaluator.
///
/// Holds no mutable state; every evaluation reads its own [`Scope`].
#[derive(Default)]
pub struct Interpreter<'a> {
    examples: Option<&'a dyn ExampleSource>,
}

impl<'a> Interpreter<'a> {
    pub fn new() -> Self {
        Self { examples: None }
    }

    /// An interpreter that resolves `example<N>` attributes through `examples`.
    pub fn with_examples(examples: &'a dyn ExampleSource) -> Self {
        Self {
            examples: Some(examples),
        }
    }

    /// Parse and evaluate a payload. Syntax errors surface as [`RuntimeError::Syntax`].
    pub fn eval_source(&self, source: &str, scope: &Scope) -> Result<Value, RuntimeError> {
        let expr = parse_expression(source)?;
        self.eval(&expr, scope)
    }

    pub fn eval(&self, expr: &Expr, scope: &Scope) -> Result<Value, RuntimeError> {
        self.eval_expr(expr, scope)
    }
}

/// A runtime error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RuntimeError {
    #[error("name '{0}' is not defined")]
    NameError(String),

    #[error("'{ty}' object has no attribute '{attr}'")]
    AttributeError { ty: String, attr: String },

    #[error("{0}")]
    TypeError(String),

    #[error("division by zero")]
    ZeroDivision,

    #[error("{0}")]
    IndexError(String),

    #[error("{0}")]
    KeyError(String),

    #[error("{0}")]
    ValueError(String),

    #[error("{0}")]
    Overflow(String),

    /// A host method's own failure.
    #[error("{message}")]
    Host { kind: String, message: String },

    #[error("invalid syntax: {0}")]
    Syntax(#[from] SyntaxError),
}

impl RuntimeError {
    /// A failure raised by host code, with its own error kind.
    pub fn host(kind: impl Into<String>, message: impl Into<String>) -> Self {
        RuntimeError::Host {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Exception-style name of this error.
    pub fn kind(&self) -> &str {
        match self {
            RuntimeError::NameError(_) => "NameError",
            RuntimeError::AttributeError { .. } => "AttributeError",
            RuntimeError::TypeError(_) => "TypeError",
            RuntimeError::ZeroDivision => "ZeroDivisionError",
            RuntimeError::IndexError(_) => "IndexError",
            RuntimeError::KeyError(_) => "KeyError",
            RuntimeError::ValueError(_) => "ValueError",
            RuntimeError::Overflow(_) => "OverflowError",
            RuntimeError::Host { kind, .. } => kind,
            RuntimeError::Syntax(_) => "SyntaxError",
        }
    }

    /// `Kind: message`, the form shown to users. Syntax errors carry their
    /// fix-it hint along.
    pub fn detail(&self) -> String {
        let detail = format!("{}: {}", self.kind(), self);
        match self {
            RuntimeError::Syntax(err) => match err.hint() {
                Some(hint) => format!("{} (hint: {})", detail, hint),
                None => detail,
            },
            _ => detail,
        }
    }
}

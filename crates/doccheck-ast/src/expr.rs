// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression AST nodes.

use crate::Span;

/// An expression in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    height: u32,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        let height = kind.child_height().saturating_add(1);
        Self { kind, span, height }
    }

    /// Longest path from this node down to a leaf, counting both ends.
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// The kind of expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// String literal
    String(String),
    /// Boolean literal
    Bool(bool),
    /// `None`
    None,
    /// Identifier
    Ident(String),
    /// Arithmetic or short-circuit boolean operation
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Unary operation
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// Comparison chain (`a < b <= c`), each operand evaluated once
    Compare {
        first: Box<Expr>,
        rest: Vec<(CmpOp, Expr)>,
    },
    /// Function or constructor call
    Call {
        func: Box<Expr>,
        args: Vec<Arg>,
    },
    /// Method call (syntactic sugar for field access + call)
    MethodCall {
        object: Box<Expr>,
        method: String,
        args: Vec<Arg>,
    },
    /// Field access
    Field {
        object: Box<Expr>,
        field: String,
    },
    /// Index access
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    /// List literal (`[1, 2, 3]`)
    List(Vec<Expr>),
    /// Tuple literal (`(a, b)`, `(a,)`, `()`)
    Tuple(Vec<Expr>),
    /// Dict literal (`{k: v}`)
    Dict(Vec<(Expr, Expr)>),
    /// Conditional expression (`a if cond else b`)
    Conditional {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
}

impl ExprKind {
    /// Height of the tallest direct child, 0 for leaves.
    fn child_height(&self) -> u32 {
        fn tallest<'e>(children: impl Iterator<Item = &'e Expr>) -> u32 {
            children.map(Expr::height).max().unwrap_or(0)
        }
        match self {
            ExprKind::Int(_)
            | ExprKind::Float(_)
            | ExprKind::String(_)
            | ExprKind::Bool(_)
            | ExprKind::None
            | ExprKind::Ident(_) => 0,
            ExprKind::Binary { left, right, .. } => left.height.max(right.height),
            ExprKind::Unary { operand, .. } => operand.height,
            ExprKind::Compare { first, rest } => {
                first.height.max(tallest(rest.iter().map(|(_, e)| e)))
            }
            ExprKind::Call { func: object, args }
            | ExprKind::MethodCall { object, args, .. } => {
                object.height.max(tallest(args.iter().map(|a| &a.value)))
            }
            ExprKind::Field { object, .. } => object.height,
            ExprKind::Index { object, index } => object.height.max(index.height),
            ExprKind::List(items) | ExprKind::Tuple(items) => tallest(items.iter()),
            ExprKind::Dict(entries) => {
                tallest(entries.iter().flat_map(|(k, v)| [k, v]))
            }
            ExprKind::Conditional { cond, then_branch, else_branch } => {
                cond.height.max(then_branch.height).max(else_branch.height)
            }
        }
    }
}

/// A call argument, positional or `name=value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    pub name: Option<String>,
    pub value: Expr,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    // Logical (short-circuit)
    And,
    Or,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::FloorDiv => "//",
            BinOp::Mod => "%",
            BinOp::Pow => "**",
            BinOp::And => "and",
            BinOp::Or => "or",
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    In,
    NotIn,
    Is,
    IsNot,
}

impl CmpOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Gt => ">",
            CmpOp::Le => "<=",
            CmpOp::Ge => ">=",
            CmpOp::In => "in",
            CmpOp::NotIn => "not in",
            CmpOp::Is => "is",
            CmpOp::IsNot => "is not",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Negation (-)
    Neg,
    /// Identity (+)
    Pos,
    /// Logical not
    Not,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(n: i64) -> Expr {
        Expr::new(ExprKind::Int(n), Span::new(0, 1))
    }

    #[test]
    fn height_follows_tallest_child() {
        assert_eq!(leaf(1).height(), 1);
        let sum = Expr::new(
            ExprKind::Binary { op: BinOp::Add, left: Box::new(leaf(1)), right: Box::new(leaf(2)) },
            Span::new(0, 5),
        );
        assert_eq!(sum.height(), 2);
        let list = Expr::new(ExprKind::List(vec![leaf(0), sum]), Span::new(0, 9));
        assert_eq!(list.height(), 3);
        let call = Expr::new(
            ExprKind::Call {
                func: Box::new(Expr::new(ExprKind::Ident("f".to_string()), Span::new(0, 1))),
                args: vec![Arg { name: None, value: list }],
            },
            Span::new(0, 12),
        );
        assert_eq!(call.height(), 4);
    }
}

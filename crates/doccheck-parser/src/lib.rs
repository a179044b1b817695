// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parser for doccheck tag payloads.
//!
//! Transforms a token stream into a single expression tree.

mod hints;
mod parser;

pub use parser::{ParseError, Parser};

use doccheck_ast::expr::Expr;
use doccheck_lexer::{LexError, Lexer};

/// Why a payload could not be turned into an expression.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SyntaxError {
    #[error("{} (at column {})", .0[0].message, .0[0].span.start + 1)]
    Lex(Vec<LexError>),
    #[error("{} (at column {})", .0.message, .0.span.start + 1)]
    Parse(ParseError),
}

impl SyntaxError {
    /// Suggestion attached to the first error, if any.
    pub fn hint(&self) -> Option<&str> {
        match self {
            SyntaxError::Lex(errors) => errors.first().and_then(|e| e.hint.as_deref()),
            SyntaxError::Parse(error) => error.hint.as_deref(),
        }
    }
}

/// Lex and parse a payload into one expression.
pub fn parse_expression(source: &str) -> Result<Expr, SyntaxError> {
    let lex_result = Lexer::new(source).tokenize();
    if !lex_result.is_ok() {
        return Err(SyntaxError::Lex(lex_result.errors));
    }
    Parser::new(lex_result.tokens).parse().map_err(SyntaxError::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use doccheck_ast::expr::{BinOp, CmpOp, ExprKind, UnaryOp};

    fn parse(src: &str) -> Expr {
        match parse_expression(src) {
            Ok(expr) => expr,
            Err(e) => panic!("Parse errors in {:?}: {}", src, e),
        }
    }

    #[test]
    fn parse_constructor_with_keyword_arg() {
        let expr = parse(r#"cls(2, 6, c="hello")"#);
        if let ExprKind::Call { func, args } = expr.kind {
            assert_eq!(func.kind, ExprKind::Ident("cls".to_string()));
            assert_eq!(args.len(), 3);
            assert!(args[0].name.is_none());
            assert_eq!(args[2].name.as_deref(), Some("c"));
            assert_eq!(args[2].value.kind, ExprKind::String("hello".to_string()));
        } else {
            panic!("Expected call expression");
        }
    }

    #[test]
    fn parse_method_chain_comparison() {
        let expr = parse(r#"cls.example1.draft_Format("ADD") == "2.6.hello.ADD""#);
        let ExprKind::Compare { first, rest } = expr.kind else {
            panic!("Expected comparison");
        };
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].0, CmpOp::Eq);
        let ExprKind::MethodCall { object, method, args } = first.kind else {
            panic!("Expected method call");
        };
        assert_eq!(method, "draft_Format");
        assert_eq!(args.len(), 1);
        assert!(matches!(object.kind, ExprKind::Field { ref field, .. } if field == "example1"));
    }

    #[test]
    fn parse_precedence_mul_over_add() {
        let expr = parse("1 + 2 * 3");
        let ExprKind::Binary { op, right, .. } = expr.kind else {
            panic!("Expected binary");
        };
        assert_eq!(op, BinOp::Add);
        assert!(matches!(right.kind, ExprKind::Binary { op: BinOp::Mul, .. }));
    }

    #[test]
    fn parse_power_binds_tighter_than_negation() {
        let expr = parse("-2 ** 2");
        let ExprKind::Unary { op, operand } = expr.kind else {
            panic!("Expected unary");
        };
        assert_eq!(op, UnaryOp::Neg);
        assert!(matches!(operand.kind, ExprKind::Binary { op: BinOp::Pow, .. }));
    }

    #[test]
    fn parse_power_is_right_associative() {
        let expr = parse("2 ** 3 ** 2");
        let ExprKind::Binary { op, left, right } = expr.kind else {
            panic!("Expected binary");
        };
        assert_eq!(op, BinOp::Pow);
        assert_eq!(left.kind, ExprKind::Int(2));
        assert!(matches!(right.kind, ExprKind::Binary { op: BinOp::Pow, .. }));
    }

    #[test]
    fn parse_not_wraps_comparison() {
        let expr = parse("not a == b and c");
        let ExprKind::Binary { op, left, .. } = expr.kind else {
            panic!("Expected binary");
        };
        assert_eq!(op, BinOp::And);
        let ExprKind::Unary { op, operand } = left.kind else {
            panic!("Expected unary");
        };
        assert_eq!(op, UnaryOp::Not);
        assert!(matches!(operand.kind, ExprKind::Compare { .. }));
    }

    #[test]
    fn parse_comparison_chain() {
        let expr = parse("0 < x <= 10 != y");
        let ExprKind::Compare { rest, .. } = expr.kind else {
            panic!("Expected comparison");
        };
        let ops: Vec<CmpOp> = rest.iter().map(|(op, _)| *op).collect();
        assert_eq!(ops, vec![CmpOp::Lt, CmpOp::Le, CmpOp::Ne]);
    }

    #[test]
    fn parse_not_in_and_is_not() {
        let expr = parse("a not in b");
        assert!(matches!(expr.kind, ExprKind::Compare { ref rest, .. } if rest[0].0 == CmpOp::NotIn));
        let expr = parse("a is not None");
        assert!(matches!(expr.kind, ExprKind::Compare { ref rest, .. } if rest[0].0 == CmpOp::IsNot));
    }

    #[test]
    fn parse_collections() {
        assert!(matches!(parse("[1, 2, 3,]").kind, ExprKind::List(ref items) if items.len() == 3));
        assert!(matches!(parse("()").kind, ExprKind::Tuple(ref items) if items.is_empty()));
        assert!(matches!(parse("(1,)").kind, ExprKind::Tuple(ref items) if items.len() == 1));
        assert_eq!(parse("(1)").kind, ExprKind::Int(1));
        assert!(matches!(parse("{}").kind, ExprKind::Dict(ref entries) if entries.is_empty()));
        assert!(matches!(parse("{'a': 1, 'b': [2]}").kind, ExprKind::Dict(ref entries) if entries.len() == 2));
    }

    #[test]
    fn parse_conditional_expression() {
        let expr = parse("1 if flag else 2");
        assert!(matches!(expr.kind, ExprKind::Conditional { .. }));
    }

    #[test]
    fn parse_adjacent_strings_concatenate() {
        assert_eq!(parse("'ab' \"cd\"").kind, ExprKind::String("abcd".to_string()));
    }

    #[test]
    fn parse_index_after_dict_literal() {
        let expr = parse(r#"{"this_dict": 234}["this_dict"] == 234"#);
        assert!(matches!(expr.kind, ExprKind::Compare { ref first, .. } if matches!(first.kind, ExprKind::Index { .. })));
    }

    #[test]
    fn parse_rejects_trailing_tokens() {
        let err = parse_expression("a b").unwrap_err();
        assert!(matches!(err, SyntaxError::Parse(_)));
        assert!(err.to_string().contains("column 3"));
    }

    #[test]
    fn parse_rejects_assignment() {
        let err = parse_expression("x = 1").unwrap_err();
        assert_eq!(err.hint(), Some("use '==' to compare values"));
    }

    #[test]
    fn parse_rejects_unclosed_call() {
        let err = parse_expression("f(1, 2").unwrap_err();
        assert!(err.to_string().contains("Unclosed '('"));
    }

    #[test]
    fn parse_rejects_slices() {
        let err = parse_expression("items[1:2]").unwrap_err();
        assert_eq!(err.hint(), Some("slices are not supported in payloads"));
    }

    #[test]
    fn parse_reports_lex_errors() {
        let err = parse_expression("a && b").unwrap_err();
        assert!(matches!(err, SyntaxError::Lex(_)));
    }

    #[test]
    fn parse_empty_payload() {
        let err = parse_expression("   ").unwrap_err();
        assert_eq!(err.hint(), Some("the payload is incomplete"));
    }

    #[test]
    fn parse_rejects_runaway_parentheses() {
        let src = format!("{}1{}", "(".repeat(50_000), ")".repeat(50_000));
        let err = parse_expression(&src).unwrap_err();
        assert!(err.to_string().contains("nested more than 200 levels"), "{}", err);
    }

    #[test]
    fn parse_accepts_moderate_nesting() {
        let src = format!("{}1{}", "(".repeat(150), ")".repeat(150));
        assert_eq!(parse(&src).kind, ExprKind::Int(1));
        let list = format!("{}{}", "[".repeat(150), "]".repeat(150));
        assert_eq!(parse(&list).height(), 150);
    }

    #[test]
    fn parse_rejects_tall_trees() {
        let sum = vec!["1"; 5_000].join(" + ");
        assert!(parse_expression(&sum).is_err());
        let negations = format!("{}1", "-".repeat(5_000));
        assert!(parse_expression(&negations).is_err());
        let attrs = format!("x{}", ".a".repeat(5_000));
        assert!(parse_expression(&attrs).is_err());
        let conditionals = format!("{}0", "1 if x else ".repeat(5_000));
        assert!(parse_expression(&conditionals).is_err());
        assert!(parse_expression(&vec!["1"; 100].join(" + ")).is_ok());
    }
}

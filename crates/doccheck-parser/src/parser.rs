// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The parser implementation using Pratt parsing for expressions.

use doccheck_ast::expr::{Arg, BinOp, CmpOp, Expr, ExprKind, UnaryOp};
use doccheck_ast::token::{Token, TokenKind};
use doccheck_ast::Span;

/// Binding power of `not` as a prefix operator: its operand may contain
/// comparisons and arithmetic but stops at `and` / `or`.
const NOT_BP: u8 = 5;
/// Binding power of every comparison operator (they chain, never nest).
const CMP_BP: u8 = 7;
/// Binding power of unary `-` / `+`.
const UNARY_BP: u8 = 15;
/// Binding power of calls, attribute access and indexing.
const POSTFIX_BP: u8 = 19;
/// Deepest nesting a payload may have, as parentheses or as the height of
/// the resulting tree.
pub const MAX_NESTING: usize = 200;
/// Recursion budget: each nesting level costs up to two descents.
const MAX_RECURSION: usize = 2 * MAX_NESTING;

/// The parser for payload expressions.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(Token { kind: TokenKind::Eof, .. })) {
            let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
            tokens.push(Token { kind: TokenKind::Eof, span: Span::new(end, end) });
        }
        Self { tokens, pos: 0, depth: 0 }
    }

    /// Parse the whole token stream as exactly one expression.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expr()?;
        if !self.at_end() {
            return Err(ParseError::expected(
                "end of expression",
                self.current_kind(),
                self.current().span,
            ));
        }
        Ok(expr)
    }

    // =========================================================================
    // Token Navigation
    // =========================================================================

    fn current(&self) -> &Token {
        // The lexer always terminates the stream with Eof, and `advance`
        // never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn peek(&self, n: usize) -> &TokenKind {
        self.tokens.get(self.pos + n).map(|t| &t.kind).unwrap_or(&TokenKind::Eof)
    }

    fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if !self.at_end() {
            self.pos += 1;
        }
        token
    }

    fn previous_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span.end)
            .unwrap_or(0)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::expected(
                kind.display_name(),
                self.current_kind(),
                self.current().span,
            ))
        }
    }

    /// Allow keywords as attribute/method names after `.`.
    fn expect_ident_or_keyword(&mut self) -> Result<String, ParseError> {
        let name = match self.current_kind() {
            TokenKind::Ident(name) => name.clone(),
            TokenKind::And => "and".to_string(),
            TokenKind::Or => "or".to_string(),
            TokenKind::Not => "not".to_string(),
            TokenKind::In => "in".to_string(),
            TokenKind::Is => "is".to_string(),
            TokenKind::If => "if".to_string(),
            TokenKind::Else => "else".to_string(),
            _ => {
                return Err(ParseError::expected(
                    "a name",
                    self.current_kind(),
                    self.current().span,
                ))
            }
        };
        self.advance();
        Ok(name)
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Full expression, including the conditional form `a if cond else b`.
    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.nested(Self::parse_conditional)
    }

    fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        let start = self.current().span.start;
        let then_branch = self.parse_expr_bp(0)?;

        if !self.match_token(&TokenKind::If) {
            return Ok(then_branch);
        }

        let cond = self.parse_expr_bp(0)?;
        self.expect(&TokenKind::Else)?;
        let else_branch = self.parse_expr()?;
        let end = else_branch.span.end;
        Ok(Expr::new(
            ExprKind::Conditional {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            Span::new(start, end),
        ))
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        self.nested(|p| p.parse_expr_bp_inner(min_bp))
    }

    /// Run one level of recursive descent, bounding both the recursion and
    /// the height of what it builds.
    fn nested(&mut self, parse: impl FnOnce(&mut Self) -> Result<Expr, ParseError>) -> Result<Expr, ParseError> {
        if self.depth >= MAX_RECURSION {
            return Err(self.too_deep());
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        let expr = result?;
        if expr.height() as usize > MAX_NESTING {
            return Err(self.too_deep());
        }
        Ok(expr)
    }

    fn too_deep(&self) -> ParseError {
        ParseError {
            span: self.current().span,
            message: format!("expression nested more than {} levels deep", MAX_NESTING),
            hint: Some("build the inner part as an example and refer to it".to_string()),
        }
    }

    fn parse_expr_bp_inner(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let start = self.current().span.start;
        let mut lhs = self.parse_prefix()?;

        loop {
            if lhs.height() as usize > MAX_NESTING {
                return Err(self.too_deep());
            }

            if self.is_postfix() {
                if POSTFIX_BP < min_bp {
                    break;
                }
                lhs = self.parse_postfix(lhs)?;
                continue;
            }

            if self.comparison_op().is_some() {
                if CMP_BP < min_bp {
                    break;
                }
                lhs = self.parse_comparison_chain(lhs, start)?;
                continue;
            }

            if let Some((l_bp, r_bp)) = self.infix_bp() {
                if l_bp < min_bp {
                    break;
                }

                let op = self.parse_binop()?;
                let rhs = self.parse_expr_bp(r_bp)?;
                let end = rhs.span.end;
                lhs = Expr::new(
                    ExprKind::Binary { op, left: Box::new(lhs), right: Box::new(rhs) },
                    Span::new(start, end),
                );
                continue;
            }

            break;
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let start = self.current().span.start;

        match self.current_kind().clone() {
            TokenKind::Int(n) => {
                self.advance();
                Ok(Expr::new(ExprKind::Int(n), Span::new(start, self.previous_end())))
            }
            TokenKind::Float(n) => {
                self.advance();
                Ok(Expr::new(ExprKind::Float(n), Span::new(start, self.previous_end())))
            }
            TokenKind::String(s) => {
                self.advance();
                // Adjacent string literals concatenate.
                let mut text = s;
                while let TokenKind::String(next) = self.current_kind() {
                    text.push_str(next);
                    self.advance();
                }
                Ok(Expr::new(ExprKind::String(text), Span::new(start, self.previous_end())))
            }
            TokenKind::True | TokenKind::False => {
                let value = matches!(self.current_kind(), TokenKind::True);
                self.advance();
                Ok(Expr::new(ExprKind::Bool(value), Span::new(start, self.previous_end())))
            }
            TokenKind::None => {
                self.advance();
                Ok(Expr::new(ExprKind::None, Span::new(start, self.previous_end())))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Expr::new(ExprKind::Ident(name), Span::new(start, self.previous_end())))
            }
            TokenKind::Minus | TokenKind::Plus => {
                let op = if self.check(&TokenKind::Minus) { UnaryOp::Neg } else { UnaryOp::Pos };
                self.advance();
                let operand = self.parse_expr_bp(UNARY_BP)?;
                let end = operand.span.end;
                Ok(Expr::new(ExprKind::Unary { op, operand: Box::new(operand) }, Span::new(start, end)))
            }
            TokenKind::Not => {
                self.advance();
                let operand = self.parse_expr_bp(NOT_BP)?;
                let end = operand.span.end;
                Ok(Expr::new(
                    ExprKind::Unary { op: UnaryOp::Not, operand: Box::new(operand) },
                    Span::new(start, end),
                ))
            }
            TokenKind::LParen => self.parse_paren_or_tuple(),
            TokenKind::LBracket => self.parse_list_literal(),
            TokenKind::LBrace => self.parse_dict_literal(),
            _ => Err(ParseError::expected(
                "expression",
                self.current_kind(),
                self.current().span,
            )),
        }
    }

    fn parse_paren_or_tuple(&mut self) -> Result<Expr, ParseError> {
        let start = self.current().span.start;
        self.expect(&TokenKind::LParen)?;

        if self.match_token(&TokenKind::RParen) {
            return Ok(Expr::new(ExprKind::Tuple(Vec::new()), Span::new(start, self.previous_end())));
        }

        let first = self.parse_expr()?;

        if self.match_token(&TokenKind::Comma) {
            let mut elements = vec![first];
            while !self.check(&TokenKind::RParen) && !self.at_end() {
                elements.push(self.parse_expr()?);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RParen)?;
            Ok(Expr::new(ExprKind::Tuple(elements), Span::new(start, self.previous_end())))
        } else {
            self.expect(&TokenKind::RParen)?;
            Ok(first)
        }
    }

    fn parse_list_literal(&mut self) -> Result<Expr, ParseError> {
        let start = self.current().span.start;
        self.expect(&TokenKind::LBracket)?;

        let mut elements = Vec::new();
        while !self.check(&TokenKind::RBracket) && !self.at_end() {
            elements.push(self.parse_expr()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RBracket)?;
        Ok(Expr::new(ExprKind::List(elements), Span::new(start, self.previous_end())))
    }

    fn parse_dict_literal(&mut self) -> Result<Expr, ParseError> {
        let start = self.current().span.start;
        self.expect(&TokenKind::LBrace)?;

        let mut entries = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            let key = self.parse_expr()?;
            self.expect(&TokenKind::Colon)?;
            let value = self.parse_expr()?;
            entries.push((key, value));
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RBrace)?;
        Ok(Expr::new(ExprKind::Dict(entries), Span::new(start, self.previous_end())))
    }

    fn parse_postfix(&mut self, lhs: Expr) -> Result<Expr, ParseError> {
        let start = lhs.span.start;

        match self.current_kind() {
            TokenKind::LParen => {
                self.advance();
                let args = self.parse_args()?;
                self.expect(&TokenKind::RParen)?;
                Ok(Expr::new(
                    ExprKind::Call { func: Box::new(lhs), args },
                    Span::new(start, self.previous_end()),
                ))
            }

            TokenKind::Dot => {
                self.advance();
                let field = self.expect_ident_or_keyword()?;

                if self.match_token(&TokenKind::LParen) {
                    let args = self.parse_args()?;
                    self.expect(&TokenKind::RParen)?;
                    Ok(Expr::new(
                        ExprKind::MethodCall { object: Box::new(lhs), method: field, args },
                        Span::new(start, self.previous_end()),
                    ))
                } else {
                    Ok(Expr::new(
                        ExprKind::Field { object: Box::new(lhs), field },
                        Span::new(start, self.previous_end()),
                    ))
                }
            }

            TokenKind::LBracket => {
                self.advance();
                let index = self.parse_expr()?;
                self.expect(&TokenKind::RBracket)?;
                Ok(Expr::new(
                    ExprKind::Index { object: Box::new(lhs), index: Box::new(index) },
                    Span::new(start, self.previous_end()),
                ))
            }

            _ => Ok(lhs),
        }
    }

    fn parse_args(&mut self) -> Result<Vec<Arg>, ParseError> {
        let mut args: Vec<Arg> = Vec::new();

        while !self.check(&TokenKind::RParen) && !self.at_end() {
            let name = match self.current_kind().clone() {
                TokenKind::Ident(name) if self.peek(1) == &TokenKind::Eq => {
                    self.advance();
                    self.advance();
                    Some(name)
                }
                _ => None,
            };

            if name.is_none() && args.iter().any(|a| a.name.is_some()) {
                return Err(ParseError {
                    span: self.current().span,
                    message: "positional argument follows keyword argument".to_string(),
                    hint: Some("move positional arguments before name=value arguments".to_string()),
                });
            }

            let value = self.parse_expr()?;
            args.push(Arg { name, value });
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        Ok(args)
    }

    /// Parse `lhs op operand (op operand)*` into one comparison chain.
    fn parse_comparison_chain(&mut self, first: Expr, start: usize) -> Result<Expr, ParseError> {
        let mut rest = Vec::new();

        while let Some(op) = self.comparison_op() {
            // `not in` and `is not` are two tokens.
            let width = if matches!(op, CmpOp::NotIn | CmpOp::IsNot) { 2 } else { 1 };
            for _ in 0..width {
                self.advance();
            }
            let operand = self.parse_expr_bp(CMP_BP + 1)?;
            rest.push((op, operand));
        }

        let end = rest.last().map(|(_, e)| e.span.end).unwrap_or(first.span.end);
        Ok(Expr::new(
            ExprKind::Compare { first: Box::new(first), rest },
            Span::new(start, end),
        ))
    }

    fn is_postfix(&self) -> bool {
        matches!(self.current_kind(), TokenKind::LParen | TokenKind::LBracket | TokenKind::Dot)
    }

    fn comparison_op(&self) -> Option<CmpOp> {
        match self.current_kind() {
            TokenKind::EqEq => Some(CmpOp::Eq),
            TokenKind::BangEq => Some(CmpOp::Ne),
            TokenKind::Lt => Some(CmpOp::Lt),
            TokenKind::Gt => Some(CmpOp::Gt),
            TokenKind::LtEq => Some(CmpOp::Le),
            TokenKind::GtEq => Some(CmpOp::Ge),
            TokenKind::In => Some(CmpOp::In),
            TokenKind::Not if self.peek(1) == &TokenKind::In => Some(CmpOp::NotIn),
            TokenKind::Is if self.peek(1) == &TokenKind::Not => Some(CmpOp::IsNot),
            TokenKind::Is => Some(CmpOp::Is),
            _ => None,
        }
    }

    fn infix_bp(&self) -> Option<(u8, u8)> {
        match self.current_kind() {
            TokenKind::Or => Some((1, 2)),
            TokenKind::And => Some((3, 4)),
            TokenKind::Plus | TokenKind::Minus => Some((11, 12)),
            TokenKind::Star | TokenKind::Slash | TokenKind::SlashSlash | TokenKind::Percent => Some((13, 14)),
            TokenKind::StarStar => Some((17, 16)), // Right-associative, binds tighter than unary minus
            _ => None,
        }
    }

    fn parse_binop(&mut self) -> Result<BinOp, ParseError> {
        let op = match self.current_kind() {
            TokenKind::Or => BinOp::Or,
            TokenKind::And => BinOp::And,
            TokenKind::Plus => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            TokenKind::Star => BinOp::Mul,
            TokenKind::Slash => BinOp::Div,
            TokenKind::SlashSlash => BinOp::FloorDiv,
            TokenKind::Percent => BinOp::Mod,
            TokenKind::StarStar => BinOp::Pow,
            _ => {
                return Err(ParseError::expected(
                    "operator like '+' or '-'",
                    self.current_kind(),
                    self.current().span,
                ))
            }
        };
        self.advance();
        Ok(op)
    }
}

/// A parser error with location and friendly message.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl ParseError {
    fn expected(expected: &str, found: &TokenKind, span: Span) -> Self {
        let message = format_expected_message(expected, found);
        let hint = crate::hints::for_expected(expected, found).map(String::from);
        Self { span, message, hint }
    }
}

/// Format a user-friendly "expected X, found Y" message.
fn format_expected_message(expected: &str, found: &TokenKind) -> String {
    match expected {
        "')'" if matches!(found, TokenKind::Eof) => "Unclosed '(' - missing ')'".to_string(),
        "']'" if matches!(found, TokenKind::Eof) => "Unclosed '[' - missing ']'".to_string(),
        "'}'" if matches!(found, TokenKind::Eof) => "Unclosed '{' - missing '}'".to_string(),
        "a name" => format!("Expected name, found {}", found.display_name()),
        "expression" => format!("Expected expression, found {}", found.display_name()),
        _ => format!("Expected {}, found {}", expected, found.display_name()),
    }
}

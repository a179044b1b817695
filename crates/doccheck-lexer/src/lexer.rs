// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The lexer implementation using logos.

use doccheck_ast::token::{Token, TokenKind};
use doccheck_ast::Span;
use logos::Logos;

/// Raw token type for logos - we parse values in a second pass.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")] // Payloads are single logical lines; all whitespace is insignificant
enum RawToken {
    // === Keywords ===
    #[token("True")]
    True,
    #[token("False")]
    False,
    #[token("None")]
    None,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,
    #[token("in")]
    In,
    #[token("is")]
    Is,
    #[token("if")]
    If,
    #[token("else")]
    Else,

    // === Operators (order matters - longer first) ===
    #[token("**")]
    StarStar,
    #[token("//")]
    SlashSlash,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token(".")]
    Dot,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,

    // === Literals ===
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    HexInt,

    #[regex(r"0[bB][01_]+")]
    BinInt,

    #[regex(r"0[oO][0-7_]+")]
    OctInt,

    // Float literals (must come before decimal int to match properly)
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+")]
    Float,

    #[regex(r"[0-9][0-9_]*")]
    DecInt,

    #[regex(r#""([^"\\]|\\.)*""#)]
    DoubleString,

    #[regex(r"'([^'\\]|\\.)*'")]
    SingleString,

    // === Identifier (must come after keywords) ===
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 20;

/// The lexer for payload expressions.
pub struct Lexer<'a> {
    source: &'a str,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given payload.
    pub fn new(source: &'a str) -> Self {
        Self { source, errors: Vec::new() }
    }

    /// Tokenize the entire payload, collecting multiple errors.
    pub fn tokenize(&mut self) -> LexResult {
        let mut tokens = Vec::new();
        let mut logos_lexer = RawToken::lexer(self.source);

        while let Some(result) = logos_lexer.next() {
            if self.errors.len() >= MAX_ERRORS {
                break;
            }

            let span = logos_lexer.span();
            let slice = logos_lexer.slice();

            let kind = match result {
                Ok(raw) => match self.convert_token(raw, slice, span.start, span.end) {
                    Ok(kind) => kind,
                    Err(e) => {
                        self.errors.push(e);
                        continue;
                    }
                },
                Err(()) => {
                    let ch = self.source[span.start..].chars().next().unwrap_or('?');
                    self.errors.push(LexError::unexpected_char(ch, span.start));
                    continue;
                }
            };

            tokens.push(Token {
                kind,
                span: Span::new(span.start, span.end),
            });
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            span: Span::new(self.source.len(), self.source.len()),
        });

        LexResult {
            tokens,
            errors: std::mem::take(&mut self.errors),
        }
    }

    /// Convert a raw logos token to our TokenKind, parsing literals.
    fn convert_token(&self, raw: RawToken, slice: &str, start: usize, end: usize) -> Result<TokenKind, LexError> {
        Ok(match raw {
            // Keywords
            RawToken::True => TokenKind::True,
            RawToken::False => TokenKind::False,
            RawToken::None => TokenKind::None,
            RawToken::And => TokenKind::And,
            RawToken::Or => TokenKind::Or,
            RawToken::Not => TokenKind::Not,
            RawToken::In => TokenKind::In,
            RawToken::Is => TokenKind::Is,
            RawToken::If => TokenKind::If,
            RawToken::Else => TokenKind::Else,

            // Operators
            RawToken::StarStar => TokenKind::StarStar,
            RawToken::SlashSlash => TokenKind::SlashSlash,
            RawToken::EqEq => TokenKind::EqEq,
            RawToken::BangEq => TokenKind::BangEq,
            RawToken::LtEq => TokenKind::LtEq,
            RawToken::GtEq => TokenKind::GtEq,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Star => TokenKind::Star,
            RawToken::Slash => TokenKind::Slash,
            RawToken::Percent => TokenKind::Percent,
            RawToken::Eq => TokenKind::Eq,
            RawToken::Lt => TokenKind::Lt,
            RawToken::Gt => TokenKind::Gt,
            RawToken::Dot => TokenKind::Dot,

            // Delimiters
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Comma => TokenKind::Comma,

            // Literals - parse the values
            RawToken::DecInt => {
                let cleaned: String = slice.chars().filter(|c| *c != '_').collect();
                let value = cleaned.parse::<i64>().map_err(|_| LexError::invalid_number(start, end))?;
                TokenKind::Int(value)
            }
            RawToken::HexInt => TokenKind::Int(parse_radix(&slice[2..], 16, start, end)?),
            RawToken::BinInt => TokenKind::Int(parse_radix(&slice[2..], 2, start, end)?),
            RawToken::OctInt => TokenKind::Int(parse_radix(&slice[2..], 8, start, end)?),
            RawToken::Float => {
                let cleaned: String = slice.chars().filter(|c| *c != '_').collect();
                let value = cleaned.parse::<f64>().map_err(|_| LexError::invalid_number(start, end))?;
                TokenKind::Float(value)
            }
            RawToken::DoubleString | RawToken::SingleString => {
                let inner = &slice[1..slice.len() - 1]; // Remove quotes
                TokenKind::String(parse_string(inner, start)?)
            }
            RawToken::Ident => TokenKind::Ident(slice.to_string()),
        })
    }
}

/// Parse the digits of a prefixed integer literal (`0x`, `0b`, `0o`).
fn parse_radix(digits: &str, radix: u32, start: usize, end: usize) -> Result<i64, LexError> {
    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    i64::from_str_radix(&cleaned, radix).map_err(|_| LexError::invalid_number(start, end))
}

/// Parse a string literal (handling escape sequences).
fn parse_string(s: &str, pos: usize) -> Result<String, LexError> {
    let mut result = String::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            result.push(parse_escape(&mut chars, pos)?);
        } else {
            result.push(c);
        }
    }

    Ok(result)
}

/// Parse an escape sequence.
fn parse_escape(chars: &mut impl Iterator<Item = char>, pos: usize) -> Result<char, LexError> {
    match chars.next() {
        Some('n') => Ok('\n'),
        Some('r') => Ok('\r'),
        Some('t') => Ok('\t'),
        Some('\\') => Ok('\\'),
        Some('0') => Ok('\0'),
        Some('\'') => Ok('\''),
        Some('"') => Ok('"'),
        Some('x') => parse_hex_escape(chars, 2, pos),
        Some('u') => parse_hex_escape(chars, 4, pos),
        _ => Err(LexError::invalid_escape(pos)),
    }
}

/// Parse a fixed-width hex escape: `\xHH` or `\uHHHH`.
fn parse_hex_escape(chars: &mut impl Iterator<Item = char>, width: usize, pos: usize) -> Result<char, LexError> {
    let mut hex = String::with_capacity(width);
    for _ in 0..width {
        match chars.next() {
            Some(c) if c.is_ascii_hexdigit() => hex.push(c),
            _ => return Err(LexError::invalid_escape(pos)),
        }
    }

    let code_point = u32::from_str_radix(&hex, 16).map_err(|_| LexError::invalid_escape(pos))?;
    char::from_u32(code_point).ok_or(LexError::invalid_escape(pos))
}

/// Result of lexing: tokens plus any errors found.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl LexResult {
    /// Returns true if lexing completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A lexer error with location and friendly message.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct LexError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl LexError {
    fn unexpected_char(ch: char, pos: usize) -> Self {
        let hint = match ch {
            '\'' | '"' => Some("Add the closing quote".to_string()),
            '!' => Some("Use 'not' for negation".to_string()),
            '&' | '|' => Some("Use 'and' / 'or' for boolean logic".to_string()),
            _ => None,
        };
        Self {
            span: Span::new(pos, pos + ch.len_utf8()),
            message: format!("Unexpected character '{}'", ch),
            hint,
        }
    }

    fn invalid_escape(pos: usize) -> Self {
        Self {
            span: Span::new(pos, pos + 1),
            message: "Invalid escape sequence".to_string(),
            hint: Some("Valid: \\n \\r \\t \\\\ \\0 \\' \\\" \\xHH \\uHHHH".to_string()),
        }
    }

    fn invalid_number(start: usize, end: usize) -> Self {
        Self {
            span: Span::new(start, end),
            message: "Invalid number".to_string(),
            hint: Some("Integers must fit in 64 bits".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let result = Lexer::new(src).tokenize();
        assert!(result.is_ok(), "Lex errors: {:?}", result.errors);
        result.tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_constructor_call() {
        assert_eq!(
            kinds(r#"cls(2, 6, "hello")"#),
            vec![
                TokenKind::Ident("cls".to_string()),
                TokenKind::LParen,
                TokenKind::Int(2),
                TokenKind::Comma,
                TokenKind::Int(6),
                TokenKind::Comma,
                TokenKind::String("hello".to_string()),
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_vs_identifiers() {
        assert_eq!(
            kinds("not nothing and android"),
            vec![
                TokenKind::Not,
                TokenKind::Ident("nothing".to_string()),
                TokenKind::And,
                TokenKind::Ident("android".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_two_char_operators() {
        assert_eq!(
            kinds("a // b ** c <= d != e"),
            vec![
                TokenKind::Ident("a".to_string()),
                TokenKind::SlashSlash,
                TokenKind::Ident("b".to_string()),
                TokenKind::StarStar,
                TokenKind::Ident("c".to_string()),
                TokenKind::LtEq,
                TokenKind::Ident("d".to_string()),
                TokenKind::BangEq,
                TokenKind::Ident("e".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_number_literals() {
        assert_eq!(
            kinds("1_000 0xff 0b101 0o17 2.5 1e3"),
            vec![
                TokenKind::Int(1000),
                TokenKind::Int(255),
                TokenKind::Int(5),
                TokenKind::Int(15),
                TokenKind::Float(2.5),
                TokenKind::Float(1000.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_quotes_and_escapes() {
        assert_eq!(
            kinds(r#"'it\'s' "a\tb" "\x41é""#),
            vec![
                TokenKind::String("it's".to_string()),
                TokenKind::String("a\tb".to_string()),
                TokenKind::String("Aé".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_chained_attribute_access() {
        assert_eq!(
            kinds("cls.example1.value"),
            vec![
                TokenKind::Ident("cls".to_string()),
                TokenKind::Dot,
                TokenKind::Ident("example1".to_string()),
                TokenKind::Dot,
                TokenKind::Ident("value".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_errors_are_collected() {
        let result = Lexer::new("a $ b ? c").tokenize();
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors[0].message.contains('$'));
    }

    #[test]
    fn test_overflowing_integer() {
        let result = Lexer::new("99999999999999999999").tokenize();
        assert!(!result.is_ok());
        assert_eq!(result.errors[0].message, "Invalid number");
    }

    #[test]
    fn test_unterminated_string_hint() {
        let result = Lexer::new("\"open").tokenize();
        assert!(!result.is_ok());
        assert!(result.errors[0].hint.is_some());
    }
}

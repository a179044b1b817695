// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error hints - suggestions for fixing common mistakes.
//!
//! Kept separate from the main parser to avoid clutter.

use doccheck_ast::token::TokenKind;

/// Get a hint for an "expected X" error based on context.
pub fn for_expected(expected: &str, found: &TokenKind) -> Option<&'static str> {
    match (expected, found) {
        // Parentheses hints
        ("')'", TokenKind::Eof) => Some("add ')' to close the parenthesis"),
        ("')'", TokenKind::Ident(_)) => Some("separate arguments with ','"),
        ("')'", _) => None,

        // Bracket hints
        ("']'", TokenKind::Eof) => Some("add ']' to close the bracket"),
        ("']'", TokenKind::Colon) => Some("slices are not supported in payloads"),
        ("']'", _) => None,

        // Brace hints
        ("'}'", TokenKind::Eof) => Some("add '}' to close the mapping"),
        ("':'", TokenKind::Comma) => Some("set literals are not supported; use a list"),
        ("':'", _) => Some("mapping entries are written key: value"),

        ("'else'", _) => Some("conditional expressions are written a if cond else b"),

        // Expression hints
        ("expression", TokenKind::Eq) => Some("use '==' to compare values"),
        ("expression", TokenKind::Eof) => Some("the payload is incomplete"),
        ("expression", _) => Some("try a value, name, or call"),

        // Name/identifier hints
        ("a name", TokenKind::Int(_)) => Some("names can't start with a number"),
        ("a name", _) => Some("names start with a letter or '_'"),

        ("end of expression", TokenKind::Eq) => Some("use '==' to compare values"),
        ("end of expression", _) => Some("a payload holds exactly one expression"),

        _ => None,
    }
}

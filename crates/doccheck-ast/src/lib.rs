// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Syntax tree types for doccheck tag payloads.
//!
//! A payload is the text after a `>>test:`, `>>error:` or `>>exampleN:` tag.
//! It is always a single expression; this crate defines the tokens and
//! expression nodes shared between the lexer, parser and interpreter.

pub mod span;
pub mod token;
pub mod expr;

pub use span::Span;

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lexer for doccheck tag payloads.
//!
//! Tokenizes a payload expression into a stream of tokens for the parser.

mod lexer;

pub use lexer::{LexError, LexResult, Lexer};

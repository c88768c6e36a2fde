//! Tokenizer for Meek source text.
//!
//! The scanner is a thin, buffered character reader: `Scanner::new` wraps
//! a source string and the parser drives it through `peek_token` /
//! `consume_token` (mirroring `original_source/token.h`'s scanner
//! interface). Comments and whitespace never surface as tokens.

pub mod scanner;
pub mod token;

pub use scanner::Scanner;
pub use token::{ScanErrorKind, Token, TokenKind, TokenPayload};

#[cfg(test)]
#[path = "tests/scanner.rs"]
mod tests;

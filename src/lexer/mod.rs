//! Lexical analysis for Monkey
//!
//! Converts source text into tokens, one token per call, without backtracking.

mod scanner;
mod token;

pub use scanner::Lexer;
pub use token::{Token, TokenKind};

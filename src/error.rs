//! Error types for the Monkey interpreter
//!
//! Two independent channels: [`SyntaxError`]s are collected by the parser and
//! [`RuntimeError`]s travel inside [`Value::Error`](crate::runtime::Value).
//! Neither is ever raised as a panic.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lexer::TokenKind;

/// Problems found while turning tokens into an AST
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SyntaxError {
    /// The parser required a specific token after the current one
    ///
    /// **Triggered by:** `let x 5;` (missing `=`), `add(1, 2` (missing `)`)
    #[error("expected next token to be {expected}, got {got} instead")]
    ExpectedToken {
        /// Token kind the grammar requires
        expected: TokenKind,
        /// Token kind actually found
        got: TokenKind,
    },

    /// A token appeared where an expression must start but cannot start one
    ///
    /// **Triggered by:** `let x = ;`, `)`
    #[error("no prefix parse function for {0} found")]
    NoPrefixParseFn(TokenKind),

    /// Integer literal does not fit in 64 bits
    #[error("could not parse {0} as integer")]
    InvalidInteger(String),

    /// Character outside the language's alphabet
    #[error("illegal token: {0}")]
    IllegalToken(String),

    /// String literal with no closing quote before end of input
    #[error("unterminated string literal: {0}")]
    UnterminatedString(String),
}

/// Errors produced while evaluating an AST
///
/// The `Display` form is the message carried by the language's error value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// Lookup walked the whole environment chain without a match
    #[error("identifier not found: {0}")]
    IdentifierNotFound(String),

    /// Infix operator applied to operands of different types
    ///
    /// **Example:** `5 + true`
    #[error("type mismatch: {left} {op} {right}")]
    TypeMismatch {
        /// Left operand type name
        left: &'static str,
        /// Operator symbol
        op: String,
        /// Right operand type name
        right: &'static str,
    },

    /// Prefix operator not defined for the operand type
    ///
    /// **Example:** `-true`
    #[error("unknown operator: {op}{operand}")]
    UnknownPrefixOperator {
        /// Operator symbol
        op: String,
        /// Operand type name
        operand: &'static str,
    },

    /// Infix operator not defined for a pair of same-typed operands
    ///
    /// **Example:** `true + false`
    #[error("unknown operator: {left} {op} {right}")]
    UnknownInfixOperator {
        /// Left operand type name
        left: &'static str,
        /// Operator symbol
        op: String,
        /// Right operand type name
        right: &'static str,
    },

    /// Call expression whose callee is not a function
    #[error("not a function: {0}")]
    NotAFunction(&'static str),

    /// Argument count differs from the function's parameter count
    #[error("wrong number of arguments: want={want}, got={got}")]
    WrongArgumentCount {
        /// Number of declared parameters
        want: usize,
        /// Number of supplied arguments
        got: usize,
    },

    /// Integer division with a zero divisor
    #[error("division by zero")]
    DivisionByZero,

    /// Nested function calls exceeded [`EvalConfig::max_call_depth`](crate::runtime::EvalConfig)
    #[error("maximum call depth exceeded: {0}")]
    CallDepthExceeded(usize),
}

/// Ordered list of syntax errors from one parse
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParseErrors(pub Vec<SyntaxError>);

impl ParseErrors {
    /// Human-readable messages, in the order they were found
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    /// Returns true if no syntax error was recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of recorded errors
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

/// Crate-level error for the one-shot [`run`](crate::run) API
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Source did not parse; the program was not evaluated
    #[error("parse errors:\n{0}")]
    Parse(ParseErrors),

    /// Evaluation produced an error value
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

impl From<Vec<SyntaxError>> for Error {
    fn from(errors: Vec<SyntaxError>) -> Self {
        Error::Parse(ParseErrors(errors))
    }
}

/// Result type for Monkey operations
pub type Result<T> = std::result::Result<T, Error>;

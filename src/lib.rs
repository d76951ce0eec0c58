//! # Monkey - a small dynamically-typed language
//!
//! A front-to-back interpreter pipeline: a lexer that pulls one token at a
//! time, a Pratt parser that builds an AST and collects syntax errors, and a
//! tree-walking evaluator with closures over shared lexical environments.
//!
//! ## Quick Start
//!
//! ```rust
//! use monkey::{Environment, Evaluator, Parser, Value};
//!
//! let mut parser = Parser::from_source("let add = fn(x, y) { x + y }; add(2, 3);");
//! let program = parser.parse_program();
//! assert!(parser.errors().is_empty());
//!
//! let env = Environment::new().into_shared();
//! let mut evaluator = Evaluator::new();
//! assert_eq!(evaluator.eval(&program, &env), Value::Integer(5));
//! ```
//!
//! One environment per session keeps `let` bindings alive between calls:
//!
//! ```rust
//! use monkey::{eval, parse, Environment, Value};
//!
//! let env = Environment::new().into_shared();
//! let (first, _) = parse("let a = 5;");
//! eval(&first, &env);
//! let (second, _) = parse("a * 2");
//! assert_eq!(eval(&second, &env), Value::Integer(10));
//! ```
//!
//! ## Error Handling
//!
//! Syntax errors are collected by the parser; runtime errors are values.
//!
//! ```rust
//! use monkey::{run, Error};
//!
//! match run("5 + true;") {
//!     Err(Error::Runtime(err)) => assert_eq!(err.to_string(), "type mismatch: INTEGER + BOOLEAN"),
//!     other => panic!("unexpected result: {:?}", other),
//! }
//!
//! match run("let x 5;") {
//!     Err(Error::Parse(errors)) => {
//!         assert_eq!(errors.messages(), vec!["expected next token to be =, got INT instead"])
//!     }
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Source Code → Lexer → Tokens → Parser → AST → Evaluator → Value
//! ```
//!
//! - [`Lexer`] - Tokenizes source code on demand
//! - [`Parser`] - Parses tokens into an Abstract Syntax Tree (AST)
//! - [`Evaluator`] - Walks the AST and produces values
//! - [`Value`] - Runtime value representation
//! - [`Environment`] - Variable storage with lexical scoping

/// Version of the Monkey interpreter
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod lexer;
pub mod parser;
pub mod runtime;
mod stack;

// Re-export main types
pub use error::{Error, ParseErrors, Result, RuntimeError, SyntaxError};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{
    BlockStatement, Expression, Identifier, InfixOp, Node, Parser, PrefixOp, Program, Statement,
};
pub use runtime::{eval, Env, EvalConfig, Environment, Evaluator, Function, Value};

/// Parses source text, returning the program and any syntax errors
pub fn parse(source: &str) -> (Program, Vec<SyntaxError>) {
    let mut parser = Parser::from_source(source);
    let program = parser.parse_program();
    (program, parser.errors().to_vec())
}

/// Parses and evaluates source text in a fresh environment
pub fn run(source: &str) -> Result<Value> {
    let program = Parser::from_source(source).parse()?;
    let env = Environment::new().into_shared();
    let result = Evaluator::new().execute(&program, &env);
    env.borrow_mut().clear();
    result
}

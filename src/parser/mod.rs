//! Monkey Parser Module
//!
//! Parses the token stream into an Abstract Syntax Tree (AST): recursive
//! descent for statements, precedence climbing for expressions.

mod ast;
mod pratt_parser;

pub use ast::{
    BlockStatement, Expression, Identifier, InfixOp, Node, Precedence, PrefixOp, Program,
    Statement,
};
pub use pratt_parser::Parser;

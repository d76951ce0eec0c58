use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// A single token from the source code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The type of token
    pub kind: TokenKind,
    /// Exact source text of the token (without quotes for strings)
    pub literal: String,
    /// Line number where token appears (1-indexed)
    pub line: usize,
    /// Column number where token starts (1-indexed)
    pub column: usize,
}

impl Token {
    /// Creates a new token with the given properties
    pub fn new(kind: TokenKind, literal: impl Into<String>, line: usize, column: usize) -> Self {
        Token {
            kind,
            literal: literal.into(),
            line,
            column,
        }
    }
}

/// All possible token types in Monkey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Special
    /// Character outside the alphabet, or an unterminated string
    Illegal,
    /// End of input marker
    Eof,

    // Identifiers and literals
    /// Identifier (`x`, `add`, `foo_bar`)
    Ident,
    /// Integer literal
    Int,
    /// String literal
    String,

    // Operators
    /// Assignment operator (=)
    Assign,
    /// Plus operator (+)
    Plus,
    /// Minus operator (-)
    Minus,
    /// Bang operator (!)
    Bang,
    /// Asterisk operator (*)
    Asterisk,
    /// Slash operator (/)
    Slash,
    /// Less than operator (<)
    Lt,
    /// Greater than operator (>)
    Gt,
    /// Equality operator (==)
    Eq,
    /// Inequality operator (!=)
    NotEq,

    // Delimiters
    /// Comma delimiter
    Comma,
    /// Semicolon delimiter
    Semicolon,
    /// Left parenthesis (
    LParen,
    /// Right parenthesis )
    RParen,
    /// Left brace {
    LBrace,
    /// Right brace }
    RBrace,

    // Keywords
    /// `fn`
    Function,
    /// `let`
    Let,
    /// `true`
    True,
    /// `false`
    False,
    /// `if`
    If,
    /// `else`
    Else,
    /// `return`
    Return,
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenKind> = {
        let mut m = HashMap::new();
        m.insert("fn", TokenKind::Function);
        m.insert("let", TokenKind::Let);
        m.insert("true", TokenKind::True);
        m.insert("false", TokenKind::False);
        m.insert("if", TokenKind::If);
        m.insert("else", TokenKind::Else);
        m.insert("return", TokenKind::Return);
        m
    };
}

impl TokenKind {
    /// Check if token is a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Function
                | TokenKind::Let
                | TokenKind::True
                | TokenKind::False
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::Return
        )
    }

    /// Get keyword from string
    pub fn keyword(s: &str) -> Option<TokenKind> {
        KEYWORDS.get(s).copied()
    }

    /// Classifies a scanned word: keyword kind if reserved, identifier otherwise
    pub fn lookup_ident(s: &str) -> TokenKind {
        Self::keyword(s).unwrap_or(TokenKind::Ident)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Eof => "EOF",
            TokenKind::Ident => "IDENT",
            TokenKind::Int => "INT",
            TokenKind::String => "STRING",
            TokenKind::Assign => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Bang => "!",
            TokenKind::Asterisk => "*",
            TokenKind::Slash => "/",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::Eq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Function => "FUNCTION",
            TokenKind::Let => "LET",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::Return => "RETURN",
        };
        f.write_str(name)
    }
}

use std::collections::HashMap;

use lazy_static::lazy_static;

use super::ast::{
    BlockStatement, Expression, Identifier, InfixOp, Precedence, PrefixOp, Program, Statement,
};
use crate::error::{Error, ParseErrors, Result, SyntaxError};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::stack::ensure_sufficient_stack;

type PrefixParseFn = fn(&mut Parser) -> Option<Expression>;
type InfixParseFn = fn(&mut Parser, Expression) -> Option<Expression>;

lazy_static! {
    /// Tokens that can start an expression
    static ref PREFIX_PARSE_FNS: HashMap<TokenKind, PrefixParseFn> = {
        let mut m: HashMap<TokenKind, PrefixParseFn> = HashMap::new();
        m.insert(TokenKind::Ident, Parser::parse_identifier);
        m.insert(TokenKind::Int, Parser::parse_integer_literal);
        m.insert(TokenKind::String, Parser::parse_string_literal);
        m.insert(TokenKind::True, Parser::parse_boolean);
        m.insert(TokenKind::False, Parser::parse_boolean);
        m.insert(TokenKind::Bang, Parser::parse_prefix_expression);
        m.insert(TokenKind::Minus, Parser::parse_prefix_expression);
        m.insert(TokenKind::LParen, Parser::parse_grouped_expression);
        m.insert(TokenKind::If, Parser::parse_if_expression);
        m.insert(TokenKind::Function, Parser::parse_function_literal);
        m
    };

    /// Tokens that continue an expression from its left-hand side
    static ref INFIX_PARSE_FNS: HashMap<TokenKind, InfixParseFn> = {
        let mut m: HashMap<TokenKind, InfixParseFn> = HashMap::new();
        for kind in [
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Asterisk,
            TokenKind::Slash,
            TokenKind::Eq,
            TokenKind::NotEq,
            TokenKind::Lt,
            TokenKind::Gt,
        ] {
            m.insert(kind, Parser::parse_infix_expression);
        }
        m.insert(TokenKind::LParen, Parser::parse_call_expression);
        m
    };
}

/// Recursive-descent statement parser with a Pratt expression core
///
/// Pulls tokens from the lexer on demand through a two-token window
/// (`cur_token`, `peek_token`). Syntax errors are collected rather than
/// returned early, so one pass reports as many problems as it can.
pub struct Parser {
    lexer: Lexer,
    cur_token: Token,
    peek_token: Token,
    errors: Vec<SyntaxError>,
}

impl Parser {
    /// Creates a parser reading from `lexer`
    pub fn new(mut lexer: Lexer) -> Self {
        let cur_token = lexer.next_token();
        let peek_token = lexer.next_token();
        Parser {
            lexer,
            cur_token,
            peek_token,
            errors: Vec::new(),
        }
    }

    /// Creates a parser over a source string
    pub fn from_source(source: &str) -> Self {
        Self::new(Lexer::new(source))
    }

    /// Syntax errors recorded so far, in source order
    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    /// Syntax errors rendered as messages
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Parses tokens until end of input
    ///
    /// Always returns a `Program`; check [`Parser::errors`] before trusting it.
    /// A statement that failed to parse is left out of the program.
    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();

        while !self.cur_token_is(TokenKind::Eof) {
            match self.parse_statement() {
                Some(stmt) => program.statements.push(stmt),
                None => self.synchronize(),
            }
            self.next_token();
        }

        tracing::debug!(
            statements = program.statements.len(),
            errors = self.errors.len(),
            "parsed program"
        );
        program
    }

    /// Parses the whole input, failing if any syntax error was recorded
    pub fn parse(&mut self) -> Result<Program> {
        let program = self.parse_program();
        if self.errors.is_empty() {
            Ok(program)
        } else {
            Err(Error::Parse(ParseErrors(self.errors.clone())))
        }
    }

    fn next_token(&mut self) {
        let next = self.lexer.next_token();
        self.cur_token = std::mem::replace(&mut self.peek_token, next);
    }

    // Skip the rest of a broken top-level statement.
    fn synchronize(&mut self) {
        while !self.cur_token_is(TokenKind::Semicolon) && !self.cur_token_is(TokenKind::Eof) {
            self.next_token();
        }
    }

    fn cur_token_is(&self, kind: TokenKind) -> bool {
        self.cur_token.kind == kind
    }

    fn peek_token_is(&self, kind: TokenKind) -> bool {
        self.peek_token.kind == kind
    }

    /// Advances only if the peek token has the expected kind
    fn expect_peek(&mut self, kind: TokenKind) -> Option<()> {
        if self.peek_token_is(kind) {
            self.next_token();
            Some(())
        } else {
            self.errors.push(SyntaxError::ExpectedToken {
                expected: kind,
                got: self.peek_token.kind,
            });
            None
        }
    }

    fn peek_precedence(&self) -> Precedence {
        Precedence::of(self.peek_token.kind)
    }

    fn cur_precedence(&self) -> Precedence {
        Precedence::of(self.cur_token.kind)
    }

    fn skip_optional_semicolon(&mut self) {
        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token();
        }
    }

    // ---------------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------------

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.cur_token.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        self.expect_peek(TokenKind::Ident)?;
        let name = Identifier::new(self.cur_token.literal.clone());

        self.expect_peek(TokenKind::Assign)?;
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_optional_semicolon();

        Some(Statement::Let { name, value })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        if matches!(
            self.peek_token.kind,
            TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof
        ) {
            self.skip_optional_semicolon();
            return Some(Statement::Return { value: None });
        }

        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_optional_semicolon();

        Some(Statement::Return { value: Some(value) })
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.skip_optional_semicolon();
        Some(Statement::Expression(expr))
    }

    fn parse_block_statement(&mut self) -> Option<BlockStatement> {
        ensure_sufficient_stack(|| {
            let mut block = BlockStatement::default();
            self.next_token();

            while !self.cur_token_is(TokenKind::RBrace) && !self.cur_token_is(TokenKind::Eof) {
                if let Some(stmt) = self.parse_statement() {
                    block.statements.push(stmt);
                }
                self.next_token();
            }

            if self.cur_token_is(TokenKind::Eof) {
                self.errors.push(SyntaxError::ExpectedToken {
                    expected: TokenKind::RBrace,
                    got: TokenKind::Eof,
                });
                return None;
            }

            Some(block)
        })
    }

    // ---------------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------------

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        ensure_sufficient_stack(|| {
            let Some(prefix) = PREFIX_PARSE_FNS.get(&self.cur_token.kind).copied() else {
                self.no_prefix_parse_fn_error();
                return None;
            };
            let mut left = prefix(self)?;

            while !self.peek_token_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
                let Some(infix) = INFIX_PARSE_FNS.get(&self.peek_token.kind).copied() else {
                    return Some(left);
                };
                self.next_token();
                left = infix(self, left)?;
            }

            Some(left)
        })
    }

    fn no_prefix_parse_fn_error(&mut self) {
        let literal = self.cur_token.literal.clone();
        let err = match self.cur_token.kind {
            TokenKind::Illegal if literal.starts_with('"') => SyntaxError::UnterminatedString(literal),
            TokenKind::Illegal => SyntaxError::IllegalToken(literal),
            kind => SyntaxError::NoPrefixParseFn(kind),
        };
        self.errors.push(err);
    }

    fn parse_identifier(&mut self) -> Option<Expression> {
        Some(Expression::Identifier(Identifier::new(
            self.cur_token.literal.clone(),
        )))
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        match self.cur_token.literal.parse::<i64>() {
            Ok(value) => Some(Expression::IntegerLiteral(value)),
            Err(_) => {
                self.errors
                    .push(SyntaxError::InvalidInteger(self.cur_token.literal.clone()));
                None
            }
        }
    }

    fn parse_string_literal(&mut self) -> Option<Expression> {
        Some(Expression::StringLiteral(self.cur_token.literal.clone()))
    }

    fn parse_boolean(&mut self) -> Option<Expression> {
        Some(Expression::Boolean(self.cur_token_is(TokenKind::True)))
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let operator = PrefixOp::from_token(self.cur_token.kind)?;
        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;

        Some(Expression::Prefix {
            operator,
            right: Box::new(right),
        })
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let operator = InfixOp::from_token(self.cur_token.kind)?;
        let precedence = self.cur_precedence();
        self.next_token();
        let right = self.parse_expression(precedence)?;

        Some(Expression::Infix {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;
        Some(expr)
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        self.expect_peek(TokenKind::LParen)?;
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;

        self.expect_peek(TokenKind::LBrace)?;
        let consequence = self.parse_block_statement()?;

        let alternative = if self.peek_token_is(TokenKind::Else) {
            self.next_token();
            self.expect_peek(TokenKind::LBrace)?;
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        Some(Expression::If {
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        self.expect_peek(TokenKind::LParen)?;
        let parameters = self.parse_function_parameters()?;

        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block_statement()?;

        Some(Expression::FunctionLiteral { parameters, body })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut parameters = Vec::new();

        if self.peek_token_is(TokenKind::RParen) {
            self.next_token();
            return Some(parameters);
        }

        self.expect_peek(TokenKind::Ident)?;
        parameters.push(Identifier::new(self.cur_token.literal.clone()));

        while self.peek_token_is(TokenKind::Comma) {
            self.next_token();
            self.expect_peek(TokenKind::Ident)?;
            parameters.push(Identifier::new(self.cur_token.literal.clone()));
        }

        self.expect_peek(TokenKind::RParen)?;
        Some(parameters)
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let arguments = self.parse_call_arguments()?;
        Some(Expression::Call {
            function: Box::new(function),
            arguments,
        })
    }

    fn parse_call_arguments(&mut self) -> Option<Vec<Expression>> {
        let mut arguments = Vec::new();

        if self.peek_token_is(TokenKind::RParen) {
            self.next_token();
            return Some(arguments);
        }

        self.next_token();
        arguments.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_token_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            arguments.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.expect_peek(TokenKind::RParen)?;
        Some(arguments)
    }
}

use super::token::{Token, TokenKind};

/// On-demand scanner for Monkey source text
///
/// Produces one token per [`Lexer::next_token`] call. Once the input is
/// exhausted every further call returns an `Eof` token.
#[derive(Debug, Clone)]
pub struct Lexer {
    /// Source code as character vector
    source: Vec<char>,
    /// Start position of current token
    start: usize,
    /// Current position in source (next character to read)
    current: usize,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column number (1-indexed)
    column: usize,
}

impl Lexer {
    /// Creates a new lexer from source code
    pub fn new(source: &str) -> Self {
        Lexer {
            source: source.chars().collect(),
            start: 0,
            current: 0,
            line: 1,
            column: 1,
        }
    }

    /// Scans and returns the next token
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        self.start = self.current;
        let (line, column) = (self.line, self.column);

        if self.is_at_end() {
            return Token::new(TokenKind::Eof, "", line, column);
        }

        let c = self.advance();
        let kind = match c {
            '=' => {
                if self.match_char('=') {
                    TokenKind::Eq
                } else {
                    TokenKind::Assign
                }
            }
            '!' => {
                if self.match_char('=') {
                    TokenKind::NotEq
                } else {
                    TokenKind::Bang
                }
            }
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Asterisk,
            '/' => TokenKind::Slash,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,

            '"' => return self.scan_string(line, column),
            c if c.is_ascii_digit() => return self.scan_number(line, column),
            c if is_letter(c) => return self.scan_identifier_or_keyword(line, column),

            _ => TokenKind::Illegal,
        };

        Token::new(kind, self.lexeme(), line, column)
    }

    /// Scans the whole input, returning every token including the final `Eof`
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), ' ' | '\t' | '\n' | '\r') {
            self.advance();
        }
    }

    fn scan_string(&mut self, line: usize, column: usize) -> Token {
        while !self.is_at_end() && self.peek() != '"' {
            self.advance();
        }

        if self.is_at_end() {
            // The parser reports the partial literal, opening quote included.
            return Token::new(TokenKind::Illegal, self.lexeme(), line, column);
        }

        let value: String = self.source[self.start + 1..self.current].iter().collect();
        self.advance(); // Closing "

        Token::new(TokenKind::String, value, line, column)
    }

    fn scan_number(&mut self, line: usize, column: usize) -> Token {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        Token::new(TokenKind::Int, self.lexeme(), line, column)
    }

    fn scan_identifier_or_keyword(&mut self, line: usize, column: usize) -> Token {
        while is_letter(self.peek()) || self.peek().is_ascii_digit() {
            self.advance();
        }

        let text = self.lexeme();
        Token::new(TokenKind::lookup_ident(&text), text, line, column)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.source[self.current]
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.peek() != expected {
            false
        } else {
            self.advance();
            true
        }
    }

    fn lexeme(&self) -> String {
        self.source[self.start..self.current].iter().collect()
    }
}

impl Iterator for Lexer {
    type Item = Token;

    /// Yields tokens up to, but not including, `Eof`
    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        (token.kind != TokenKind::Eof).then_some(token)
    }
}

fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

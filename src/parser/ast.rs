use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::lexer::TokenKind;
use crate::stack::ensure_sufficient_stack;

/// Behaviour shared by every AST node
///
/// The `Display` impl is the node's canonical source rendering: text that
/// parses back into an equivalent tree.
pub trait Node: fmt::Display {
    /// Literal text of the token the node starts with
    fn token_literal(&self) -> String;

    /// Canonical source text for this node
    fn render(&self) -> String {
        self.to_string()
    }
}

/// Complete Monkey program, the parse root
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    /// Top-level statements in source order
    pub statements: Vec<Statement>,
}

/// Statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// Binding: `let name = value;`
    Let {
        /// Name being bound
        name: Identifier,
        /// Expression producing the bound value
        value: Expression,
    },

    /// Return statement: `return value;`
    Return {
        /// Optional value to return
        value: Option<Expression>,
    },

    /// Expression statement
    Expression(Expression),
}

/// Braced statement sequence used as the body of `if` and `fn`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlockStatement {
    /// Statements inside the braces
    #[serde(serialize_with = "serialize_nested")]
    pub statements: Vec<Statement>,
}

/// A name in binding or reference position
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    /// Identifier text
    pub name: String,
}

impl Identifier {
    /// Creates an identifier node
    pub fn new(name: impl Into<String>) -> Self {
        Identifier { name: name.into() }
    }
}

/// Expressions
///
/// `Clone`, `Drop`, `Display` and `Serialize` are safe on arbitrarily deep
/// trees.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Variable reference expression
    Identifier(Identifier),
    /// Integer literal expression
    IntegerLiteral(i64),
    /// String literal expression
    StringLiteral(String),
    /// Boolean literal expression
    Boolean(bool),

    /// Prefix operation: `-x`, `!x`
    Prefix {
        /// Prefix operator to apply
        operator: PrefixOp,
        /// Operand expression
        #[serde(serialize_with = "serialize_nested")]
        right: Box<Expression>,
    },

    /// Infix operation: `a + b`
    Infix {
        /// Infix operator to apply
        operator: InfixOp,
        /// Left operand expression
        #[serde(serialize_with = "serialize_nested")]
        left: Box<Expression>,
        /// Right operand expression
        #[serde(serialize_with = "serialize_nested")]
        right: Box<Expression>,
    },

    /// Conditional expression: `if (cond) { ... } else { ... }`
    If {
        /// Condition expression to evaluate
        #[serde(serialize_with = "serialize_nested")]
        condition: Box<Expression>,
        /// Block evaluated when the condition is truthy
        consequence: BlockStatement,
        /// Optional block evaluated otherwise
        alternative: Option<BlockStatement>,
    },

    /// Function literal: `fn(x, y) { ... }`
    FunctionLiteral {
        /// Parameter names in declaration order
        parameters: Vec<Identifier>,
        /// Function body
        body: BlockStatement,
    },

    /// Call expression: `callee(arg1, arg2)`
    Call {
        /// Expression producing the function to call
        #[serde(serialize_with = "serialize_nested")]
        function: Box<Expression>,
        /// Arguments in source order
        #[serde(serialize_with = "serialize_nested")]
        arguments: Vec<Expression>,
    },
}

/// Prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrefixOp {
    /// Logical NOT operator (!x)
    Bang,
    /// Negation operator (-x)
    Minus,
}

/// Infix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfixOp {
    /// Addition operator (+)
    Plus,
    /// Subtraction operator (-)
    Minus,
    /// Multiplication operator (*)
    Asterisk,
    /// Division operator (/)
    Slash,
    /// Less than operator (<)
    Lt,
    /// Greater than operator (>)
    Gt,
    /// Equality operator (==)
    Eq,
    /// Inequality operator (!=)
    NotEq,
}

/// Operator precedence levels, lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Binds nothing; the threshold for a full expression
    Lowest,
    /// Equality operators (==, !=)
    Equals,
    /// Relational operators (<, >)
    LessGreater,
    /// Addition and subtraction (+, -)
    Sum,
    /// Multiplication and division (*, /)
    Product,
    /// Prefix operators (-x, !x)
    Prefix,
    /// Call operator (f(x))
    Call,
}

impl Precedence {
    /// Binding power of a token in infix position
    pub fn of(kind: TokenKind) -> Precedence {
        match kind {
            TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
            TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Asterisk | TokenKind::Slash => Precedence::Product,
            TokenKind::LParen => Precedence::Call,
            _ => Precedence::Lowest,
        }
    }
}

impl PrefixOp {
    /// Maps a token to its prefix operator, if it is one
    pub fn from_token(kind: TokenKind) -> Option<PrefixOp> {
        match kind {
            TokenKind::Bang => Some(PrefixOp::Bang),
            TokenKind::Minus => Some(PrefixOp::Minus),
            _ => None,
        }
    }
}

impl InfixOp {
    /// Maps a token to its infix operator, if it is one
    pub fn from_token(kind: TokenKind) -> Option<InfixOp> {
        match kind {
            TokenKind::Plus => Some(InfixOp::Plus),
            TokenKind::Minus => Some(InfixOp::Minus),
            TokenKind::Asterisk => Some(InfixOp::Asterisk),
            TokenKind::Slash => Some(InfixOp::Slash),
            TokenKind::Lt => Some(InfixOp::Lt),
            TokenKind::Gt => Some(InfixOp::Gt),
            TokenKind::Eq => Some(InfixOp::Eq),
            TokenKind::NotEq => Some(InfixOp::NotEq),
            _ => None,
        }
    }
}

impl Clone for Expression {
    fn clone(&self) -> Self {
        ensure_sufficient_stack(|| match self {
            Expression::Identifier(ident) => Expression::Identifier(ident.clone()),
            Expression::IntegerLiteral(n) => Expression::IntegerLiteral(*n),
            Expression::StringLiteral(s) => Expression::StringLiteral(s.clone()),
            Expression::Boolean(b) => Expression::Boolean(*b),
            Expression::Prefix { operator, right } => Expression::Prefix {
                operator: *operator,
                right: right.clone(),
            },
            Expression::Infix {
                operator,
                left,
                right,
            } => Expression::Infix {
                operator: *operator,
                left: left.clone(),
                right: right.clone(),
            },
            Expression::If {
                condition,
                consequence,
                alternative,
            } => Expression::If {
                condition: condition.clone(),
                consequence: consequence.clone(),
                alternative: alternative.clone(),
            },
            Expression::FunctionLiteral { parameters, body } => Expression::FunctionLiteral {
                parameters: parameters.clone(),
                body: body.clone(),
            },
            Expression::Call {
                function,
                arguments,
            } => Expression::Call {
                function: function.clone(),
                arguments: arguments.clone(),
            },
        })
    }
}

// Children are detached onto a worklist so dropping a deep tree never
// recurses once per level.
impl Drop for Expression {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut expr) = pending.pop() {
            expr.detach_children(&mut pending);
        }
    }
}

impl Expression {
    fn detach_children(&mut self, out: &mut Vec<Expression>) {
        match self {
            Expression::Prefix { right, .. } => out.push(take_boxed(right)),
            Expression::Infix { left, right, .. } => {
                out.push(take_boxed(left));
                out.push(take_boxed(right));
            }
            Expression::If {
                condition,
                consequence,
                alternative,
            } => {
                out.push(take_boxed(condition));
                consequence.detach_expressions(out);
                if let Some(alt) = alternative {
                    alt.detach_expressions(out);
                }
            }
            Expression::FunctionLiteral { body, .. } => body.detach_expressions(out),
            Expression::Call {
                function,
                arguments,
            } => {
                out.push(take_boxed(function));
                out.append(arguments);
            }
            Expression::Identifier(_)
            | Expression::IntegerLiteral(_)
            | Expression::StringLiteral(_)
            | Expression::Boolean(_) => {}
        }
    }
}

impl BlockStatement {
    fn detach_expressions(&mut self, out: &mut Vec<Expression>) {
        for stmt in self.statements.drain(..) {
            match stmt {
                Statement::Let { value, .. } | Statement::Expression(value) => out.push(value),
                Statement::Return { value } => out.extend(value),
            }
        }
    }
}

fn take_boxed(expr: &mut Box<Expression>) -> Expression {
    std::mem::replace(expr.as_mut(), Expression::Boolean(false))
}

fn serialize_nested<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    ensure_sufficient_stack(|| value.serialize(serializer))
}

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PrefixOp::Bang => write!(f, "!"),
            PrefixOp::Minus => write!(f, "-"),
        }
    }
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InfixOp::Plus => write!(f, "+"),
            InfixOp::Minus => write!(f, "-"),
            InfixOp::Asterisk => write!(f, "*"),
            InfixOp::Slash => write!(f, "/"),
            InfixOp::Lt => write!(f, "<"),
            InfixOp::Gt => write!(f, ">"),
            InfixOp::Eq => write!(f, "=="),
            InfixOp::NotEq => write!(f, "!="),
        }
    }
}

// An expression statement needs a `;` when another statement follows it,
// otherwise `a; b` would render as `a b`.
fn fmt_statements(f: &mut fmt::Formatter, statements: &[Statement]) -> fmt::Result {
    for (i, stmt) in statements.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", stmt)?;
        if matches!(stmt, Statement::Expression(_)) && i + 1 < statements.len() {
            write!(f, ";")?;
        }
    }
    Ok(())
}

fn fmt_comma_separated<T: fmt::Display>(f: &mut fmt::Formatter, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_statements(f, &self.statements)
    }
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.statements.is_empty() {
            return write!(f, "{{ }}");
        }
        write!(f, "{{ ")?;
        fmt_statements(f, &self.statements)?;
        write!(f, " }}")
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Statement::Let { name, value } => write!(f, "let {} = {};", name, value),
            Statement::Return { value: Some(value) } => write!(f, "return {};", value),
            Statement::Return { value: None } => write!(f, "return;"),
            Statement::Expression(expr) => write!(f, "{}", expr),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        ensure_sufficient_stack(|| {
            match self {
                Expression::Identifier(ident) => write!(f, "{}", ident),
                Expression::IntegerLiteral(n) => write!(f, "{}", n),
                Expression::StringLiteral(s) => write!(f, "\"{}\"", s),
                Expression::Boolean(b) => write!(f, "{}", b),
                Expression::Prefix { operator, right } => write!(f, "({}{})", operator, right),
                Expression::Infix {
                    operator,
                    left,
                    right,
                } => write!(f, "({} {} {})", left, operator, right),
                Expression::If {
                    condition,
                    consequence,
                    alternative,
                } => {
                    write!(f, "if ({}) {}", condition, consequence)?;
                    if let Some(alt) = alternative {
                        write!(f, " else {}", alt)?;
                    }
                    Ok(())
                }
                Expression::FunctionLiteral { parameters, body } => {
                    write!(f, "fn(")?;
                    fmt_comma_separated(f, parameters)?;
                    write!(f, ") {}", body)
                }
                Expression::Call {
                    function,
                    arguments,
                } => {
                    write!(f, "{}(", function)?;
                    fmt_comma_separated(f, arguments)?;
                    write!(f, ")")
                }
            }
        })
    }
}

impl Node for Program {
    fn token_literal(&self) -> String {
        self.statements
            .first()
            .map(Node::token_literal)
            .unwrap_or_default()
    }
}

impl Node for BlockStatement {
    fn token_literal(&self) -> String {
        "{".to_string()
    }
}

impl Node for Statement {
    fn token_literal(&self) -> String {
        match self {
            Statement::Let { .. } => "let".to_string(),
            Statement::Return { .. } => "return".to_string(),
            Statement::Expression(expr) => expr.token_literal(),
        }
    }
}

impl Node for Identifier {
    fn token_literal(&self) -> String {
        self.name.clone()
    }
}

impl Node for Expression {
    fn token_literal(&self) -> String {
        match self {
            Expression::Identifier(ident) => ident.token_literal(),
            Expression::IntegerLiteral(n) => n.to_string(),
            Expression::StringLiteral(s) => s.clone(),
            Expression::Boolean(b) => b.to_string(),
            Expression::Prefix { operator, .. } => operator.to_string(),
            Expression::Infix { operator, .. } => operator.to_string(),
            Expression::If { .. } => "if".to_string(),
            Expression::FunctionLiteral { .. } => "fn".to_string(),
            Expression::Call { .. } => "(".to_string(),
        }
    }
}

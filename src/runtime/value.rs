use std::fmt;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::parser::{BlockStatement, Identifier};
use crate::runtime::Env;

/// Runtime value representation
#[derive(Debug, Clone)]
pub enum Value {
    /// 64-bit integer value
    Integer(i64),
    /// Boolean value
    Boolean(bool),
    /// String value
    String(String),
    /// Function value (closure)
    Function(Rc<Function>),
    /// Absence of a value (`if` without a taken branch, `let`)
    Null,
    /// Runtime error that aborted evaluation
    Error(RuntimeError),
}

/// A user-defined function together with the environment it was defined in
pub struct Function {
    /// Parameter names, bound positionally on call
    pub parameters: Vec<Identifier>,
    /// Function body
    pub body: BlockStatement,
    /// Captured environment (shared, not copied)
    pub env: Env,
}

impl Value {
    /// Returns the type name used in runtime error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Boolean(_) => "BOOLEAN",
            Value::String(_) => "STRING",
            Value::Function(_) => "FUNCTION",
            Value::Null => "NULL",
            Value::Error(_) => "ERROR",
        }
    }

    /// Returns true if the value is truthy in a boolean context
    ///
    /// Only `false` and `null` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Boolean(false))
    }

    /// Returns true for error values
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<RuntimeError> for Value {
    fn from(err: RuntimeError) -> Self {
        Value::Error(err)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "{}", s),
            Value::Function(func) => write!(f, "{}", func),
            Value::Null => write!(f, "null"),
            Value::Error(err) => write!(f, "ERROR: {}", err),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "fn(")?;
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ") {}", self.body)
    }
}

// The captured environment may hold this very function, so it is left out.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Error(a), Value::Error(b)) => a == b,
            // Functions compared by identity
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

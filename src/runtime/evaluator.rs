use std::rc::Rc;

use crate::error::{Error, Result, RuntimeError};
use crate::parser::{BlockStatement, Expression, InfixOp, PrefixOp, Program, Statement};
use crate::runtime::{Env, Environment, Function, Value};
use crate::stack::ensure_sufficient_stack;

/// Evaluator limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalConfig {
    /// Deepest allowed nesting of function calls
    pub max_call_depth: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            max_call_depth: 128,
        }
    }
}

impl EvalConfig {
    /// Sets the maximum function call depth
    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }
}

/// Non-local exit travelling up through statement sequences
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// `return` unwinding to the nearest call boundary (or the top level)
    Return(Value),
    /// Runtime error unwinding to the top level
    Error(RuntimeError),
}

impl From<RuntimeError> for Signal {
    fn from(err: RuntimeError) -> Self {
        Signal::Error(err)
    }
}

/// Outcome of evaluating one node
pub type Flow = std::result::Result<Value, Signal>;

/// AST nodes the evaluator can walk
pub trait Evaluate {
    /// Evaluates the node in `env`
    fn evaluate(&self, evaluator: &mut Evaluator, env: &Env) -> Flow;
}

impl Evaluate for Program {
    fn evaluate(&self, evaluator: &mut Evaluator, env: &Env) -> Flow {
        evaluator.eval_statements(&self.statements, env)
    }
}

impl Evaluate for BlockStatement {
    fn evaluate(&self, evaluator: &mut Evaluator, env: &Env) -> Flow {
        evaluator.eval_statements(&self.statements, env)
    }
}

impl Evaluate for Statement {
    fn evaluate(&self, evaluator: &mut Evaluator, env: &Env) -> Flow {
        evaluator.eval_statement(self, env)
    }
}

impl Evaluate for Expression {
    fn evaluate(&self, evaluator: &mut Evaluator, env: &Env) -> Flow {
        evaluator.eval_expression(self, env)
    }
}

/// Tree-walking evaluator
///
/// Stateless apart from its configuration and the current call depth; all
/// program state lives in the environments passed in.
#[derive(Debug, Default)]
pub struct Evaluator {
    config: EvalConfig,
    depth: usize,
}

impl Evaluator {
    /// Creates an evaluator with default limits
    pub fn new() -> Self {
        Evaluator::default()
    }

    /// Creates an evaluator with custom limits
    pub fn with_config(config: EvalConfig) -> Self {
        Evaluator { config, depth: 0 }
    }

    /// Active configuration
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Evaluates any node, returning its value or an error value
    ///
    /// A top-level `return` yields the returned value.
    pub fn eval<N: Evaluate + ?Sized>(&mut self, node: &N, env: &Env) -> Value {
        match node.evaluate(self, env) {
            Ok(val) | Err(Signal::Return(val)) => val,
            Err(Signal::Error(err)) => {
                tracing::debug!(error = %err, "evaluation aborted");
                Value::Error(err)
            }
        }
    }

    /// Executes a program, turning an error value into `Err`
    pub fn execute(&mut self, program: &Program, env: &Env) -> Result<Value> {
        match self.eval(program, env) {
            Value::Error(err) => Err(Error::Runtime(err)),
            val => Ok(val),
        }
    }

    fn eval_statements(&mut self, statements: &[Statement], env: &Env) -> Flow {
        ensure_sufficient_stack(|| {
            let mut result = Value::Null;
            for stmt in statements {
                result = self.eval_statement(stmt, env)?;
            }
            Ok(result)
        })
    }

    fn eval_statement(&mut self, stmt: &Statement, env: &Env) -> Flow {
        match stmt {
            Statement::Let { name, value } => {
                let val = self.eval_expression(value, env)?;
                env.borrow_mut().set(name.name.clone(), val);
                Ok(Value::Null)
            }

            Statement::Return { value } => {
                let val = match value {
                    Some(expr) => self.eval_expression(expr, env)?,
                    None => Value::Null,
                };
                Err(Signal::Return(val))
            }

            Statement::Expression(expr) => self.eval_expression(expr, env),
        }
    }

    fn eval_expression(&mut self, expr: &Expression, env: &Env) -> Flow {
        ensure_sufficient_stack(|| {
            match expr {
                Expression::Identifier(ident) => Ok(env.borrow().get(&ident.name)?),
                Expression::IntegerLiteral(n) => Ok(Value::Integer(*n)),
                Expression::StringLiteral(s) => Ok(Value::String(s.clone())),
                Expression::Boolean(b) => Ok(Value::Boolean(*b)),

                Expression::Prefix { operator, right } => {
                    let right = self.eval_expression(right, env)?;
                    Ok(eval_prefix_expression(*operator, right)?)
                }

                Expression::Infix {
                    operator,
                    left,
                    right,
                } => {
                    let left = self.eval_expression(left, env)?;
                    let right = self.eval_expression(right, env)?;
                    Ok(eval_infix_expression(*operator, left, right)?)
                }

                Expression::If {
                    condition,
                    consequence,
                    alternative,
                } => {
                    let condition = self.eval_expression(condition, env)?;
                    if condition.is_truthy() {
                        self.eval_statements(&consequence.statements, env)
                    } else if let Some(alt) = alternative {
                        self.eval_statements(&alt.statements, env)
                    } else {
                        Ok(Value::Null)
                    }
                }

                Expression::FunctionLiteral { parameters, body } => {
                    Ok(Value::Function(Rc::new(Function {
                        parameters: parameters.clone(),
                        body: body.clone(),
                        env: Rc::clone(env),
                    })))
                }

                Expression::Call {
                    function,
                    arguments,
                } => {
                    let function = self.eval_expression(function, env)?;
                    let args = arguments
                        .iter()
                        .map(|arg| self.eval_expression(arg, env))
                        .collect::<std::result::Result<Vec<_>, _>>()?;
                    self.apply_function(function, args)
                }
            }
        })
    }

    fn apply_function(&mut self, function: Value, args: Vec<Value>) -> Flow {
        let func = match function {
            Value::Function(func) => func,
            other => return Err(RuntimeError::NotAFunction(other.type_name()).into()),
        };

        if func.parameters.len() != args.len() {
            return Err(RuntimeError::WrongArgumentCount {
                want: func.parameters.len(),
                got: args.len(),
            }
            .into());
        }

        if self.depth >= self.config.max_call_depth {
            return Err(RuntimeError::CallDepthExceeded(self.config.max_call_depth).into());
        }

        let mut scope = Environment::new_enclosed(Rc::clone(&func.env));
        for (param, arg) in func.parameters.iter().zip(args) {
            scope.set(param.name.clone(), arg);
        }
        let scope = scope.into_shared();

        self.depth += 1;
        tracing::trace!(depth = self.depth, "calling function");
        let result = self.eval_statements(&func.body.statements, &scope);
        self.depth -= 1;

        match result {
            Err(Signal::Return(val)) => Ok(val),
            other => other,
        }
    }
}

/// Evaluates any node in a fresh default evaluator
pub fn eval<N: Evaluate + ?Sized>(node: &N, env: &Env) -> Value {
    Evaluator::new().eval(node, env)
}

fn eval_prefix_expression(operator: PrefixOp, right: Value) -> std::result::Result<Value, RuntimeError> {
    match (operator, &right) {
        (PrefixOp::Bang, _) => Ok(Value::Boolean(!right.is_truthy())),
        (PrefixOp::Minus, Value::Integer(n)) => Ok(Value::Integer(n.wrapping_neg())),
        (PrefixOp::Minus, _) => Err(RuntimeError::UnknownPrefixOperator {
            op: operator.to_string(),
            operand: right.type_name(),
        }),
    }
}

fn eval_infix_expression(
    operator: InfixOp,
    left: Value,
    right: Value,
) -> std::result::Result<Value, RuntimeError> {
    match (&left, &right) {
        (Value::Integer(l), Value::Integer(r)) => eval_integer_infix_expression(operator, *l, *r),
        (Value::Boolean(l), Value::Boolean(r)) => match operator {
            InfixOp::Eq => Ok(Value::Boolean(l == r)),
            InfixOp::NotEq => Ok(Value::Boolean(l != r)),
            _ => Err(unknown_infix_operator(operator, &left, &right)),
        },
        (Value::String(l), Value::String(r)) => match operator {
            InfixOp::Plus => Ok(Value::String(format!("{}{}", l, r))),
            InfixOp::Eq => Ok(Value::Boolean(l == r)),
            InfixOp::NotEq => Ok(Value::Boolean(l != r)),
            _ => Err(unknown_infix_operator(operator, &left, &right)),
        },
        _ if left.type_name() != right.type_name() => Err(RuntimeError::TypeMismatch {
            left: left.type_name(),
            op: operator.to_string(),
            right: right.type_name(),
        }),
        _ => Err(unknown_infix_operator(operator, &left, &right)),
    }
}

fn eval_integer_infix_expression(
    operator: InfixOp,
    left: i64,
    right: i64,
) -> std::result::Result<Value, RuntimeError> {
    let val = match operator {
        InfixOp::Plus => Value::Integer(left.wrapping_add(right)),
        InfixOp::Minus => Value::Integer(left.wrapping_sub(right)),
        InfixOp::Asterisk => Value::Integer(left.wrapping_mul(right)),
        InfixOp::Slash => {
            if right == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Value::Integer(left.wrapping_div(right))
        }
        InfixOp::Lt => Value::Boolean(left < right),
        InfixOp::Gt => Value::Boolean(left > right),
        InfixOp::Eq => Value::Boolean(left == right),
        InfixOp::NotEq => Value::Boolean(left != right),
    };
    Ok(val)
}

fn unknown_infix_operator(operator: InfixOp, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::UnknownInfixOperator {
        left: left.type_name(),
        op: operator.to_string(),
        right: right.type_name(),
    }
}

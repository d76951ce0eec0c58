//! Runtime execution for Monkey programs by tree walking

mod environment;
mod evaluator;
mod value;

pub use environment::{Env, Environment};
pub use evaluator::{eval, EvalConfig, Evaluate, Evaluator, Flow, Signal};
pub use value::{Function, Value};

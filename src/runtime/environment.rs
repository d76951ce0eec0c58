use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::runtime::Value;

/// Shared handle to an environment
///
/// Closures and call frames hold these; an environment lives as long as any
/// handle to it does.
pub type Env = Rc<RefCell<Environment>>;

/// One lexical scope: its own bindings plus a link to the enclosing scope
#[derive(Debug, Default)]
pub struct Environment {
    /// Bindings owned by this scope
    store: HashMap<String, Value>,
    /// Enclosing scope (None for global scope)
    outer: Option<Env>,
}

impl Environment {
    /// Creates a global environment with no enclosing scope
    pub fn new() -> Self {
        Environment::default()
    }

    /// Creates a scope nested inside `outer`
    pub fn new_enclosed(outer: Env) -> Self {
        Environment {
            store: HashMap::new(),
            outer: Some(outer),
        }
    }

    /// Wraps the environment in a shareable handle
    pub fn into_shared(self) -> Env {
        Rc::new(RefCell::new(self))
    }

    /// Looks a name up, walking outward through enclosing scopes
    pub fn get(&self, name: &str) -> Result<Value, RuntimeError> {
        if let Some(val) = self.store.get(name) {
            return Ok(val.clone());
        }

        let mut next = self.outer.clone();
        while let Some(env) = next {
            let scope = env.borrow();
            if let Some(val) = scope.store.get(name) {
                return Ok(val.clone());
            }
            next = scope.outer.clone();
        }

        Err(RuntimeError::IdentifierNotFound(name.to_string()))
    }

    /// Binds a name in this scope, shadowing any outer binding
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.store.insert(name.into(), value);
    }

    /// Checks if a name is bound in this scope or any enclosing one
    pub fn exists(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    /// Drops every binding in this scope
    ///
    /// A function bound in the scope it was defined in keeps that scope alive
    /// through its captured handle; clearing the scope releases it.
    pub fn clear(&mut self) {
        self.store.clear();
    }
}

// Unlinks the outer chain one scope at a time so a long chain never drops
// recursively.
impl Drop for Environment {
    fn drop(&mut self) {
        let mut next = self.outer.take();
        while let Some(env) = next {
            next = match Rc::try_unwrap(env) {
                Ok(cell) => cell.into_inner().outer.take(),
                Err(_) => None,
            };
        }
    }
}

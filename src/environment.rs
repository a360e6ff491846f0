use crate::object::Object;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

// --- Environment Definition ---

#[derive(Debug, Default)]
pub struct Environment {
    // Rc<RefCell<...>> so closures can keep their defining scope alive and
    // `let` can still add bindings to it afterwards.
    outer: Option<Rc<RefCell<Environment>>>,
    bindings: HashMap<String, Rc<Object>>,
}

impl Environment {
    /// Creates a new, top-level (global) environment.
    pub fn new() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Environment::default()))
    }

    /// Creates a new environment enclosed within an outer one.
    /// Function calls use the function's captured environment as `outer`.
    pub fn new_enclosed(outer: Rc<RefCell<Environment>>) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Environment {
            outer: Some(outer),
            bindings: HashMap::new(),
        }))
    }

    /// Looks up a variable's value.
    /// Checks the current environment first, then walks up the outer environment chain.
    pub fn get(&self, name: &str) -> Option<Rc<Object>> {
        match self.bindings.get(name) {
            Some(value) => Some(Rc::clone(value)),
            None => self
                .outer
                .as_ref()
                .and_then(|outer| outer.borrow().get(name)),
        }
    }

    /// Binds `name` in the *current* frame only, shadowing any outer binding.
    pub fn set(&mut self, name: impl Into<String>, value: Rc<Object>) -> Rc<Object> {
        self.bindings.insert(name.into(), Rc::clone(&value));
        value
    }

    /// Gets all identifiers visible from this environment
    pub fn get_identifiers(&self) -> HashSet<String> {
        let mut identifiers: HashSet<String> = self.bindings.keys().cloned().collect();
        if let Some(outer) = &self.outer {
            identifiers.extend(outer.borrow().get_identifiers());
        }
        identifiers
    }
}

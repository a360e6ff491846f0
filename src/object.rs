use crate::ast::{BlockStatement, Identifier};
use crate::environment::Environment;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A runtime value. Evaluation hands these around as `Rc<Object>`.
#[derive(Debug)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    Null,
    ReturnValue(Rc<Object>), // Control-flow wrapper, unwrapped at program/function level
    Error(String),           // Runtime error, propagates like a return value
    Function(Function),
}

/// A closure: parameters and body shared with the AST, plus the environment
/// that was active where the function literal was evaluated.
#[derive(Clone)]
pub struct Function {
    pub parameters: Vec<Identifier>,
    pub body: Rc<BlockStatement>,
    pub env: Rc<RefCell<Environment>>,
}

// The captured environment usually contains the function itself, so Debug
// must not walk into it.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.parameters.iter().map(|p| p.name.as_str()).collect();
        write!(f, "Function({})", names.join(", "))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ObjectType {
    Integer,
    Boolean,
    Null,
    ReturnValue,
    Error,
    Function,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectType::Integer => "INTEGER",
            ObjectType::Boolean => "BOOLEAN",
            ObjectType::Null => "NULL",
            ObjectType::ReturnValue => "RETURN_VALUE",
            ObjectType::Error => "ERROR",
            ObjectType::Function => "FUNCTION",
        };
        f.write_str(name)
    }
}

// `true`, `false` and `null` exist once per thread and are shared by every
// evaluation, so comparing them by pointer is comparing them by value.
thread_local! {
    static TRUE: Rc<Object> = Rc::new(Object::Boolean(true));
    static FALSE: Rc<Object> = Rc::new(Object::Boolean(false));
    static NULL: Rc<Object> = Rc::new(Object::Null);
}

impl Object {
    pub fn native_bool(value: bool) -> Rc<Object> {
        if value {
            TRUE.with(Rc::clone)
        } else {
            FALSE.with(Rc::clone)
        }
    }

    pub fn null() -> Rc<Object> {
        NULL.with(Rc::clone)
    }

    pub fn error(message: impl Into<String>) -> Rc<Object> {
        Rc::new(Object::Error(message.into()))
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Integer(_) => ObjectType::Integer,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::Null => ObjectType::Null,
            Object::ReturnValue(_) => ObjectType::ReturnValue,
            Object::Error(_) => ObjectType::Error,
            Object::Function(_) => ObjectType::Function,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Object::Error(_))
    }

    /// `false` and `null` are falsey; everything else, `0` included, is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Boolean(false) | Object::Null)
    }

    /// User-facing rendering, as printed by the REPL.
    pub fn inspect(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{}", value),
            Object::Boolean(value) => write!(f, "{}", value),
            Object::Null => write!(f, "null"),
            Object::ReturnValue(inner) => write!(f, "{}", inner),
            Object::Error(message) => write!(f, "ERROR: {}", message),
            Object::Function(function) => {
                let names: Vec<&str> = function
                    .parameters
                    .iter()
                    .map(|p| p.name.as_str())
                    .collect();
                let body: Vec<String> = function
                    .body
                    .statements
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                write!(f, "fn({}) {{\n{}\n}}", names.join(", "), body.join("\n"))
            }
        }
    }
}

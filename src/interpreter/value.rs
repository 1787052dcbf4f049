use std::fmt;
use std::sync::Arc;

use crate::ast::{Expression, Primitive};
use crate::fmt::format_number;

use super::error::EvalError;
use super::scope::Environment;

/// Runtime value representation
#[derive(Debug, Clone)]
pub enum Value {
    /// The result of reading an identifier that is not bound.
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Arc<Vec<Value>>),
    Function(Callable),
}

impl Value {
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Arc::new(items))
    }

    /// Name of the value's runtime type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Function(_) => "function",
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }
}

impl From<&Primitive> for Value {
    fn from(primitive: &Primitive) -> Self {
        match primitive {
            Primitive::Number(number) => Value::Number(*number),
            Primitive::String(string) => Value::String(string.clone()),
            Primitive::Bool(value) => Value::Bool(*value),
            Primitive::Null => Value::Null,
        }
    }
}

/// Structural equality. Functions are never equal to anything, themselves
/// included.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Number(number) => f.write_str(&format_number(*number)),
            Value::String(string) => write!(f, "`{string}`"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Function(callable) => write!(f, "{callable}"),
        }
    }
}

/// Something that can be applied to one argument.
#[derive(Clone)]
pub enum Callable {
    Closure(Arc<Closure>),
    Builtin(BuiltinValue),
}

impl Callable {
    pub fn call(&self, argument: Value) -> Result<Value, EvalError> {
        match self {
            Callable::Closure(closure) => {
                tracing::trace!(parameter = %closure.parameter, "applying closure");
                let env = closure.env.with(closure.parameter.clone(), argument);
                closure.body.evaluate(&env)
            }
            Callable::Builtin(builtin) => builtin.apply(argument),
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Closure(closure) => f
                .debug_struct("Closure")
                .field("parameter", &closure.parameter)
                .field("body", &closure.body)
                .finish_non_exhaustive(),
            Callable::Builtin(builtin) => f
                .debug_struct("Builtin")
                .field("name", &builtin.name())
                .field("arity", &builtin.imp.arity)
                .field("args", &builtin.args)
                .finish(),
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Closure(closure) => write!(f, "\\{} -> {}", closure.parameter, closure.body),
            Callable::Builtin(builtin) => f.write_str(builtin.name()),
        }
    }
}

/// A lambda together with the environment it was evaluated in.
pub struct Closure {
    pub parameter: String,
    pub body: Arc<Expression>,
    pub env: Environment,
}

pub type BuiltinFunc = dyn Fn(Vec<Value>) -> Result<Value, EvalError> + Send + Sync;

/// A native function and the arguments applied to it so far.
#[derive(Clone)]
pub struct BuiltinValue {
    imp: Arc<BuiltinImpl>,
    args: Vec<Value>,
}

struct BuiltinImpl {
    name: String,
    arity: usize,
    func: Arc<BuiltinFunc>,
}

impl BuiltinValue {
    pub fn new(
        name: impl Into<String>,
        arity: usize,
        func: impl Fn(Vec<Value>) -> Result<Value, EvalError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            imp: Arc::new(BuiltinImpl {
                name: name.into(),
                arity,
                func: Arc::new(func),
            }),
            args: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.imp.name
    }

    /// Collect one more argument, running the function once all of them are
    /// there.
    fn apply(&self, argument: Value) -> Result<Value, EvalError> {
        let mut args = self.args.clone();
        args.push(argument);
        if args.len() >= self.imp.arity {
            (self.imp.func)(args)
        } else {
            Ok(Value::Function(Callable::Builtin(BuiltinValue {
                imp: Arc::clone(&self.imp),
                args,
            })))
        }
    }
}

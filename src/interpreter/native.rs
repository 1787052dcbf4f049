//! The native library bound into the base environment.
//!
//! Every native is curried: applying it to fewer arguments than it takes
//! yields a partially applied function. None of them coerce between types.

use std::cmp::Ordering;

use super::error::EvalError;
use super::scope::Environment;
use super::value::{BuiltinValue, Callable, Value};

/// Wrap a native function as a value.
pub fn builtin(
    name: &str,
    arity: usize,
    func: impl Fn(Vec<Value>) -> Result<Value, EvalError> + Send + Sync + 'static,
) -> Value {
    Value::Function(Callable::Builtin(BuiltinValue::new(name, arity, func)))
}

/// An environment with the arithmetic, comparison and branching natives
/// bound under `(+)`, `(-)`, `(*)`, `(/)`, `(==)`, `(!=)`, `(<)`, `(<=)`,
/// `(>)`, `(>=)` and `if`.
pub fn native_environment() -> Environment {
    let mut env = Environment::new();

    env.bind("(+)", builtin("(+)", 2, add));
    env.bind("(-)", arithmetic("(-)", |a, b| a - b));
    env.bind("(*)", arithmetic("(*)", |a, b| a * b));
    env.bind("(/)", arithmetic("(/)", |a, b| a / b));

    env.bind("(==)", equality("(==)", true));
    env.bind("(!=)", equality("(!=)", false));

    env.bind("(<)", comparison("(<)", Ordering::is_lt));
    env.bind("(<=)", comparison("(<=)", Ordering::is_le));
    env.bind("(>)", comparison("(>)", Ordering::is_gt));
    env.bind("(>=)", comparison("(>=)", Ordering::is_ge));

    env.bind("if", builtin("if", 3, branch));

    env
}

fn add(args: Vec<Value>) -> Result<Value, EvalError> {
    match args.as_slice() {
        [Value::Number(a), Value::Number(b)] => Ok(Value::Number(a + b)),
        [Value::String(a), Value::String(b)] => Ok(Value::String(format!("{a}{b}"))),
        _ => Err(invalid_argument("(+)", "two numbers or two strings", &args)),
    }
}

fn arithmetic(name: &'static str, op: fn(f64, f64) -> f64) -> Value {
    builtin(name, 2, move |args| match args.as_slice() {
        [Value::Number(a), Value::Number(b)] => Ok(Value::Number(op(*a, *b))),
        _ => Err(invalid_argument(name, "two numbers", &args)),
    })
}

fn equality(name: &'static str, equal: bool) -> Value {
    builtin(name, 2, move |args| match args.as_slice() {
        [a, b] => Ok(Value::Bool((a == b) == equal)),
        _ => Err(invalid_argument(name, "two values", &args)),
    })
}

/// Numbers compare numerically, strings lexicographically. Comparisons
/// involving NaN are false.
fn comparison(name: &'static str, test: fn(Ordering) -> bool) -> Value {
    builtin(name, 2, move |args| {
        let ordering = match args.as_slice() {
            [Value::Number(a), Value::Number(b)] => a.partial_cmp(b),
            [Value::String(a), Value::String(b)] => Some(a.cmp(b)),
            _ => return Err(invalid_argument(name, "two numbers or two strings", &args)),
        };
        Ok(Value::Bool(ordering.is_some_and(test)))
    })
}

fn branch(args: Vec<Value>) -> Result<Value, EvalError> {
    match args.as_slice() {
        [Value::Bool(condition), then, otherwise] => {
            let chosen = if *condition { then } else { otherwise };
            Ok(chosen.clone())
        }
        _ => Err(invalid_argument("if", "a boolean condition", &args)),
    }
}

fn invalid_argument(function: &str, expected: &str, args: &[Value]) -> EvalError {
    EvalError::InvalidArgument {
        function: function.to_string(),
        expected: expected.to_string(),
        found: args
            .iter()
            .map(Value::type_name)
            .collect::<Vec<_>>()
            .join(", "),
    }
}

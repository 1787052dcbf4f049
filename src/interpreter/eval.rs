use std::sync::Arc;

use crate::ast::{Apply, Expression, Function, Let};
use crate::depth::{DepthGuard, MAX_DEPTH};

use super::error::EvalError;
use super::scope::Environment;
use super::value::{Callable, Closure, Value};

impl Expression {
    /// Evaluate this expression against `env`.
    ///
    /// Reading an unbound identifier yields [`Value::Undefined`]. The only
    /// failures are applying something that is not a function, native
    /// functions rejecting their arguments, and recursion deeper than
    /// [`MAX_DEPTH`].
    pub fn evaluate(&self, env: &Environment) -> Result<Value, EvalError> {
        let _guard = DepthGuard::enter().ok_or(EvalError::DepthExceeded { limit: MAX_DEPTH })?;
        match self {
            Expression::Primitive(primitive) => Ok(Value::from(primitive)),
            Expression::List(items) => items
                .iter()
                .map(|item| item.evaluate(env))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::list),
            Expression::Identifier(name) => Ok(lookup(env, name)),
            Expression::InfixIdentifier(operator) => Ok(lookup(env, &format!("({operator})"))),
            Expression::Apply(apply) | Expression::ApplyInfix(apply) => evaluate_apply(apply, env),
            Expression::Let(Let { bound, function }) => {
                let closure = function.closure(env);
                closure.call(bound.evaluate(env)?)
            }
            Expression::Function(function) => Ok(Value::Function(function.closure(env))),
            Expression::Group(inner) => inner.evaluate(env),
        }
    }
}

fn lookup(env: &Environment, name: &str) -> Value {
    env.lookup(name).cloned().unwrap_or(Value::Undefined)
}

fn evaluate_apply(Apply { function, argument }: &Apply, env: &Environment) -> Result<Value, EvalError> {
    let callable = match function.evaluate(env)? {
        Value::Function(callable) => callable,
        other => {
            return Err(EvalError::NotAFunction {
                found: other.type_name().to_string(),
            })
        }
    };

    callable.call(argument.evaluate(env)?)
}

impl Function {
    /// Capture `env` for later calls.
    fn closure(&self, env: &Environment) -> Callable {
        Callable::Closure(Arc::new(Closure {
            parameter: self.parameter.clone(),
            body: Arc::clone(&self.body),
            env: env.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbound_identifier_is_undefined() {
        let value = Expression::identifier("nope")
            .evaluate(&Environment::new())
            .unwrap();
        assert!(value.is_undefined());
    }

    #[test]
    fn test_closure_captures_evaluation_environment() {
        let env = Environment::new().with("y", Value::Number(7.0));
        let function = Expression::function("x", Expression::identifier("y"))
            .evaluate(&env)
            .unwrap();

        // rebinding y afterwards does not reach into the closure
        let later = env.with("y", Value::Number(0.0)).with("f", function);
        let result = Expression::apply(Expression::identifier("f"), Expression::null())
            .evaluate(&later)
            .unwrap();
        assert_eq!(result, Value::Number(7.0));
    }

    #[test]
    fn test_applying_a_number_fails() {
        let expr = Expression::apply(Expression::number(1.0), Expression::number(2.0));
        assert_eq!(
            expr.evaluate(&Environment::new()).unwrap_err(),
            EvalError::NotAFunction {
                found: "number".to_string()
            }
        );
    }

    #[test]
    fn test_argument_is_not_evaluated_for_non_functions() {
        // the argument would fail too, but the function side is checked first
        let bad = Expression::apply(Expression::boolean(true), Expression::null());
        let expr = Expression::apply(Expression::string("s"), bad);
        assert_eq!(
            expr.evaluate(&Environment::new()).unwrap_err(),
            EvalError::NotAFunction {
                found: "string".to_string()
            }
        );
    }
}

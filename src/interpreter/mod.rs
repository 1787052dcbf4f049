//! Tree-walking evaluator.
//!
//! Evaluation threads an [`Environment`] through the tree. Lambdas capture
//! the environment they are evaluated in; calling one extends a copy of it
//! with the parameter, so nothing a call binds is visible to the caller.

mod error;
mod eval;
mod native;
mod scope;
mod value;

pub use error::EvalError;
pub use native::{builtin, native_environment};
pub use scope::Environment;
pub use value::{BuiltinFunc, BuiltinValue, Callable, Closure, Value};

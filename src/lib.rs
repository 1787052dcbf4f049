//! # juxt - a curried expression language on backtracking parser combinators
//!
//! juxt is a small, dynamically evaluated expression language in which
//! functions take one argument at a time and are applied by juxtaposition:
//! `f a b` means `(f a) b`, and `a + b` means `(+) a b`. It is built on a
//! generic parser-combinator framework that lives in the same crate.
//!
//! ## Architecture Overview
//!
//! 1. **Lexer** (`lexer`) - Splits source text into tokens with ordered regex rules
//! 2. **Parser** (`parser`) - Backtracking combinators with deepest-error
//!    reporting, and the expression grammar built from them
//! 3. **Syntax tree** (`ast`, `fmt`) - Expression nodes and their rendering back to source
//! 4. **Interpreter** (`interpreter`) - Evaluates an expression against an environment
//! 5. **Types** (`types`) - Computes the structural type of an expression before
//!    it is evaluated
//!
//! ## Pipeline Flow
//!
//! ```text
//! Source Code (&str)
//!     ↓
//! [Lexer] → Vec<Token>
//!     ↓
//! [Parser] → ast::Expression ──[Display]──→ Source Code
//!     ↓                    ╲
//! [Interpreter]        [Types] → types::Type
//!     ↓
//! interpreter::Value
//! ```
//!
//! ## Key Design Decisions
//!
//! ### Failure is a value
//! A parser returns `Result` and never unwinds. Alternatives run on cloned
//! parser states and only the successful one is committed, so a failed
//! alternative cannot leave half-consumed input behind. When every
//! alternative fails, the one that got furthest is reported.
//!
//! ### Environment passing
//! Environments are persistent maps. A lambda captures the environment it is
//! evaluated in and each call binds its parameter in a copy, which gives
//! lexical scoping without any mutable shared state.
//!
//! ### Free reads
//! Reading an unbound identifier does not fail; it evaluates to
//! [`interpreter::Value::Undefined`].
//!
//! ## Example
//!
//! ```
//! use juxt::interpreter::{native_environment, Value};
//!
//! let expr = juxt::parse("let double = \\x -> x * 2 in double 21").unwrap();
//! assert_eq!(expr.evaluate(&native_environment()).unwrap(), Value::Number(42.0));
//! assert_eq!(expr.to_string(), "let double = \\x -> x * 2 in double 21");
//! ```

pub mod ast;
mod depth;
pub mod error;
pub mod fmt;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod types;

pub use ast::Expression;
pub use depth::MAX_DEPTH;
pub use error::Error;
pub use parser::{parse, parse_with_history};

/// Parse `source` and evaluate it against `env`.
pub fn evaluate_source(
    source: &str,
    env: &interpreter::Environment,
) -> Result<interpreter::Value, Error> {
    let expr = parse(source)?;
    Ok(expr.evaluate(env)?)
}

//! # Structural types
//!
//! A second evaluator running one level above values. Every expression has a
//! [`TypeExpr`] mirror which evaluates to a [`Type`] in a
//! [`TypeEnvironment`]:
//!
//! - literals evaluate to named types from a [`TypeRegistry`]
//! - identifiers evaluate to whatever type is bound to them
//! - lambdas evaluate to closures over their parameter type
//! - applying a closure checks the argument type with
//!   [`TypeRegistry::reduce`] and computes the result type
//!
//! Named types are related by declared children rather than by name, so
//! `number` may accept `integer` without the two sharing anything else.

mod env;
mod error;
mod infer;
mod native;
mod registry;
mod ty;

pub use env::TypeEnvironment;
pub use error::TypeError;
pub use native::native_type_environment;
pub use registry::{TypeDefinition, TypeId, TypeRegistry};
pub use ty::{FunctionType, Type, TypeClosure, TypeExpr};

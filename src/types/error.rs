//! Errors of the type layer.
//!
//! Types are rendered to their names before they are stored in an error, so
//! errors stay independent of the registry they came from.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// `actual` is neither `expected` nor accepted by it.
    #[error("Couldn't match type {actual} with expected type {expected}")]
    Mismatch { expected: String, actual: String },

    /// A type that is not a function was applied to an argument.
    #[error("Type Error: Trying to apply type {found} to an argument")]
    NotAFunction { found: String },

    #[error("Unknown type {name}")]
    UnknownType { name: String },

    #[error("No type bound to {name}")]
    UnboundIdentifier { name: String },

    #[error("Type nested deeper than {limit} levels")]
    DepthExceeded { limit: usize },
}

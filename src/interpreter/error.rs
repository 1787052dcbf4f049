use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The function side of an application evaluated to something that
    /// cannot be called.
    #[error("Type Error: Trying to apply to a non-function")]
    NotAFunction { found: String },

    /// A native function received arguments it is not defined for.
    #[error("{function} expected {expected}, got {found}")]
    InvalidArgument {
        function: String,
        expected: String,
        found: String,
    },

    /// Evaluation recursed deeper than the per-thread budget.
    #[error("Evaluation nested deeper than {limit} levels")]
    DepthExceeded { limit: usize },
}

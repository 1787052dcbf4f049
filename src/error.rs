use thiserror::Error;

use crate::interpreter::EvalError;
use crate::lexer::TokenizeError;
use crate::parser::SyntaxError;
use crate::types::TypeError;

/// Any failure of the source → value pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Type(#[from] TypeError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

//! Backtracking parser combinators and the grammar built from them.
//!
//! [`parse`] turns source text into an [`Expression`]. The combinator layer
//! is generic over its output and can be reused with any token rules through
//! [`parse_tokens`].

mod combinators;
mod grammar;
mod history;
mod state;

pub use combinators::*;
pub use grammar::{
    expression, keyword, literal, padded, prefix_identifier, program, symbol, symbol_run,
    type_expression, whitespace, MAX_NESTING,
};
pub use history::HistoryNode;
pub use state::{ParseError, ParseResult, ParseState, Parser};

use thiserror::Error;

use crate::ast::Expression;
use crate::lexer::{standard_rules, tokenize, Token};

/// A parse failure ready to be shown to a user.
///
/// Line and column are 1-based and absent when the input ended before the
/// parser found what it expected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub message: String,
    pub expected: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl From<ParseError> for SyntaxError {
    fn from(err: ParseError) -> Self {
        let found = err.found();
        Self {
            message: err.to_string(),
            expected: err.expected(),
            line: found.map(|tok| tok.line),
            column: found.map(|tok| tok.column),
        }
    }
}

/// Parse a whole program with the standard token rules.
pub fn parse(source: &str) -> Result<Expression, crate::Error> {
    parse_with_history(source).map(|(expr, _)| expr)
}

/// Like [`parse`], also returning the history of the grammar rules the
/// successful parse went through.
pub fn parse_with_history(source: &str) -> Result<(Expression, HistoryNode), crate::Error> {
    thread_local! {
        static PROGRAM: BoxedParser<Expression> = program();
    }

    let tokens = tokenize(source, standard_rules()?)?;
    let mut state = ParseState::new(tokens);
    let expr = PROGRAM.with(|program| run(program, &mut state))?;
    Ok((expr, state.history()))
}

/// Run `parser` over an already tokenized input.
pub fn parse_tokens<T>(parser: &impl Parser<T>, tokens: Vec<Token>) -> Result<T, SyntaxError> {
    let mut state = ParseState::new(tokens);
    run(parser, &mut state)
}

fn run<T>(parser: &impl Parser<T>, state: &mut ParseState) -> Result<T, SyntaxError> {
    tracing::debug!(tokens = state.remaining(), "parsing");
    parser.parse(state).map_err(|err| {
        tracing::debug!(%err, "parse failed");
        SyntaxError::from(err)
    })
}

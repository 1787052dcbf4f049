//! Grammar of the expression language.
//!
//! The rules are organised by category:
//! - `literal`: numbers, strings, constants, lists and raw identifiers
//! - `expression`: application, infix operators, let, lambdas and groups
//! - `annotation`: parameter type annotations
//!
//! Whitespace is emitted by the tokenizer and skipped here, around every
//! production that may be surrounded by it.

mod annotation;
mod expression;
mod literal;

use crate::ast::Expression;
use crate::lexer::{kind, Token};

use super::combinators::{choice, eof, many, note_history, token, token_value, BoxedParser};
use super::state::{ParseState, Parser};

pub use annotation::type_expression;
pub use expression::{expression, prefix_identifier, MAX_NESTING};
pub use literal::{literal, symbol_run};

/// program := expression EOF
pub fn program() -> BoxedParser<Expression> {
    expression() - eof()
}

/// Skip any number of whitespace tokens.
pub fn whitespace() -> BoxedParser<()> {
    let any = choice(vec![
        token(kind::SPACE),
        token(kind::ENDLINE),
        token(kind::OTHER_WHITESPACE),
    ]);
    many(any) >> |_: Vec<Token>| ()
}

/// `parser` with whitespace skipped on both sides.
pub fn padded<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<T> {
    whitespace() * parser - whitespace()
}

/// A single symbol token.
pub fn symbol(text: &str) -> BoxedParser<Token> {
    token_value(kind::SYMBOL, text)
}

/// An identifier token spelling exactly `word`.
pub fn keyword(word: &str) -> BoxedParser<Token> {
    token_value(kind::IDENTIFIER, word)
}

/// "->"
fn arrow() -> BoxedParser<()> {
    (symbol("-") + symbol(">")) >> |_: (Token, Token)| ()
}

/// Record a history leaf describing the result once `parser` succeeds.
fn noted<T: 'static, F: Fn(&T) -> String + 'static>(
    parser: BoxedParser<T>,
    describe: F,
) -> BoxedParser<T> {
    BoxedParser::new(move |state: &mut ParseState| {
        let value = parser.parse(state)?;
        note_history(state, describe(&value));
        Ok(value)
    })
}

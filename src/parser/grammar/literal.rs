//! Literal parsers

use crate::ast::Expression;
use crate::fmt::format_number;
use crate::lexer::{kind, Token};
use crate::parser::combinators::{add_history, choice, list, many1, token, BoxedParser};
use crate::parser::state::{ParseState, Parser};

use super::{keyword, noted, symbol, whitespace};

/// Words that never parse as bare identifiers.
pub const KEYWORDS: [&str; 5] = ["true", "false", "null", "let", "in"];

/// Characters that may form an operator.
const OPERATOR_SYMBOLS: &str = "!?&^-+*$/.=<>%|";

/// literal := number | string | "true" | "false" | "null" | list
///
/// List elements are parsed with `expression`.
pub fn literal(expression: &BoxedParser<Expression>) -> BoxedParser<Expression> {
    choice(vec![
        number(),
        string(),
        constant("true", Expression::boolean(true)),
        constant("false", Expression::boolean(false)),
        constant("null", Expression::null()),
        list_literal(expression),
    ])
}

fn number() -> BoxedParser<Expression> {
    let parsed = BoxedParser::new(|state: &mut ParseState| {
        let start = state.clone();
        state.transaction(|state| {
            let tok = token(kind::NUMBER).parse(state)?;
            tok.value
                .as_number()
                .filter(|n| n.is_finite())
                .ok_or_else(|| start.error("finite number"))
        })
    });
    noted(parsed, |n: &f64| format!("number {}", format_number(*n))) >> Expression::number
}

fn string() -> BoxedParser<Expression> {
    let parsed = token(kind::STRING) >> |tok: Token| tok.text;
    noted(parsed, |s: &String| format!("string {s}")) >> |s: String| Expression::string(s)
}

fn constant(word: &'static str, value: Expression) -> BoxedParser<Expression> {
    noted(keyword(word), move |_: &Token| format!("keyword {word}")) >> move |_: Token| value.clone()
}

/// list := "[" (expression ("," expression)*)? "]"
fn list_literal(expression: &BoxedParser<Expression>) -> BoxedParser<Expression> {
    let items = list(
        expression.clone(),
        symbol(","),
        symbol("[") - whitespace(),
        symbol("]"),
        true,
    );
    add_history("list", items >> Expression::List)
}

/// An identifier token that is not a keyword.
pub fn bare_identifier() -> BoxedParser<String> {
    (token(kind::IDENTIFIER) >> |tok: Token| tok.text)
        .verify(|name: &String| !KEYWORDS.contains(&name.as_str()), kind::IDENTIFIER)
}

/// One or more adjacent operator symbols, joined: `=`, `==`, `<=`, `|>`.
pub fn symbol_run() -> BoxedParser<String> {
    let operator_symbol = token(kind::SYMBOL).verify(
        |tok: &Token| tok.text.chars().all(|c| OPERATOR_SYMBOLS.contains(c)),
        "operator",
    );
    many1(operator_symbol)
        >> |tokens: Vec<Token>| tokens.iter().map(|tok| tok.text.as_str()).collect::<String>()
}

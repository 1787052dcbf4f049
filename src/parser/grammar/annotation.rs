//! Type annotations on lambda parameters: `\x (number -> number) -> x 1`.

use crate::lexer::{kind, Token};
use crate::parser::combinators::{group, nested, optional, recursive, token, BoxedParser};
use crate::types::TypeExpr;

use super::expression::MAX_NESTING;
use super::{arrow, padded, symbol};

/// type := type_atom ("->" type)?
///
/// Arrows nest to the right: `a -> b -> c` is `a -> (b -> c)`.
pub fn type_expression() -> BoxedParser<TypeExpr> {
    recursive(|type_expression| {
        let inner = nested(MAX_NESTING, type_expression);
        let result = optional(arrow() * inner.clone());
        (type_atom(&inner) + result)
            >> |(parameter, result): (TypeExpr, Option<TypeExpr>)| match result {
                Some(result) => TypeExpr::function(parameter, result),
                None => parameter,
            }
    })
}

/// type_atom := identifier | "(" type ")"
fn type_atom(type_expression: &BoxedParser<TypeExpr>) -> BoxedParser<TypeExpr> {
    let named = token(kind::IDENTIFIER) >> |tok: Token| TypeExpr::Identifier(tok.text);
    let grouped = group(type_expression.clone(), symbol("("), symbol(")"));
    padded(named | grouped)
}

//! Expression parsers
//!
//! The rules are layered so that no rule re-enters itself before consuming a
//! token: an infix chain is made of applications, an application is made of
//! atoms, and only atoms recurse back into `expression`, always after an
//! opening token.

use crate::ast::{Apply, Expression, Function};
use crate::parser::combinators::{
    add_history, add_history_when, binary, choice, group, many, nested, optional, recursive,
    BinaryOperator, BoxedParser,
};
use crate::types::TypeExpr;

use super::annotation::type_expression;
use super::literal::{bare_identifier, literal, symbol_run};
use super::{arrow, keyword, noted, padded, symbol, whitespace};

/// How deep groups, lists, lets and lambdas may nest inside each other.
pub const MAX_NESTING: usize = 32;

/// expression := infix
///
/// The grammar is built once per call. Nested expressions re-enter it
/// through a shared handle, each re-entry counting as one nesting level.
pub fn expression() -> BoxedParser<Expression> {
    recursive(|expression| {
        let inner = nested(MAX_NESTING, expression);
        whitespace() * infix(&inner) - whitespace()
    })
}

/// Precedence of an infix operator. Higher binds looser.
pub fn operator_precedence(operator: &str) -> u32 {
    match operator {
        "*" | "/" | "%" => 1,
        "+" | "-" => 2,
        "==" | "!=" | "<" | "<=" | ">" | ">=" => 3,
        _ => 4,
    }
}

/// infix := application (infix_identifier application)*
fn infix(expression: &BoxedParser<Expression>) -> BoxedParser<Expression> {
    let operators = (1..=4)
        .map(|precedence| BinaryOperator::new(precedence, infix_identifier(precedence), build_infix))
        .collect();
    add_history_when("apply-infix", binary(application(expression), operators), is_infix)
}

/// `lhs OP rhs` becomes `(OP lhs) rhs`.
fn build_infix(lhs: Expression, rhs: Expression, operator: Expression) -> Expression {
    Expression::apply(Expression::apply_infix(operator, lhs), rhs)
}

fn is_infix(expr: &Expression) -> bool {
    matches!(expr, Expression::Apply(Apply { function, .. }) if matches!(**function, Expression::ApplyInfix(_)))
}

/// infix_identifier := symbol_run, other than "=", of the given precedence
fn infix_identifier(precedence: u32) -> BoxedParser<Expression> {
    let operator = symbol_run().verify(
        move |run: &String| run != "=" && operator_precedence(run) == precedence,
        "infix operator",
    );
    noted(operator, |run: &String| format!("identifier-infix {run}")) >> Expression::InfixIdentifier
}

/// application := atom atom*
fn application(expression: &BoxedParser<Expression>) -> BoxedParser<Expression> {
    let atom = atom(expression);
    let atoms = (atom.clone() + many(atom))
        >> |(first, rest): (Expression, Vec<Expression>)| {
            rest.into_iter().fold(first, Expression::apply)
        };
    add_history_when("apply", atoms, |expr: &Expression| matches!(expr, Expression::Apply(_)))
}

/// atom := group | literal | let | function | prefix_identifier
fn atom(expression: &BoxedParser<Expression>) -> BoxedParser<Expression> {
    padded(choice(vec![
        group_expression(expression),
        literal(expression),
        let_expression(expression),
        function(expression),
        prefix_identifier() >> Expression::Identifier,
    ]))
}

/// group := "(" expression ")"
fn group_expression(expression: &BoxedParser<Expression>) -> BoxedParser<Expression> {
    let inner = group(expression.clone(), symbol("("), symbol(")"));
    add_history("group", inner >> Expression::group)
}

/// let := "let" identifier "=" expression "in" expression
fn let_expression(expression: &BoxedParser<Expression>) -> BoxedParser<Expression> {
    let binding = keyword("let") * padded(bare_identifier()) - symbol("=");
    let parsed = binding + expression.clone() - keyword("in") + expression.clone();
    let built = parsed
        >> |((name, bound), body): ((String, Expression), Expression)| {
            Expression::let_in(name, bound, body)
        };
    add_history("let", built)
}

/// function := "\" identifier ("(" type ")")? "->" expression
fn function(expression: &BoxedParser<Expression>) -> BoxedParser<Expression> {
    let parameter = symbol("\\") * padded(bare_identifier());
    let annotation = optional(group(type_expression(), symbol("("), symbol(")")) - whitespace());
    let parsed = parameter + annotation - arrow() + expression.clone();
    let built = parsed
        >> |((name, parameter_type), body): ((String, Option<TypeExpr>), Expression)| {
            Expression::Function(Function::new(name, parameter_type, body))
        };
    add_history("function", built)
}

/// prefix_identifier := identifier | "(" symbol_run ")"
///
/// An operator in parentheses names the function behind it: `(+)`.
pub fn prefix_identifier() -> BoxedParser<String> {
    let operator =
        group(symbol_run(), symbol("("), symbol(")")) >> |run: String| format!("({run})");
    noted(bare_identifier() | operator, |name: &String| {
        format!("identifier-prefix {name}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_precedence() {
        assert_eq!(operator_precedence("*"), 1);
        assert_eq!(operator_precedence("-"), 2);
        assert_eq!(operator_precedence(">="), 3);
        assert_eq!(operator_precedence("|>"), 4);
    }

    #[test]
    fn test_infix_detection() {
        let plain = Expression::apply(Expression::identifier("f"), Expression::number(1.0));
        let infix = Expression::apply(
            Expression::apply_infix(Expression::infix_identifier("+"), Expression::number(1.0)),
            Expression::number(2.0),
        );
        assert!(!is_infix(&plain));
        assert!(is_infix(&infix));
    }
}

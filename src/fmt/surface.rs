//! Renders expression trees back to source text.
//!
//! The output re-parses to an equivalent tree: grouping survives as
//! [`Expression::Group`] nodes, and operator chains are printed flat in the
//! same order the parser folded them.

use std::fmt::{self, Display};

use crate::ast::{Apply, Expression, Function, Let, Primitive};

impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Primitive(primitive) => write!(f, "{primitive}"),
            Expression::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Expression::Identifier(name) | Expression::InfixIdentifier(name) => f.write_str(name),
            Expression::Apply(Apply { function, argument }) => {
                write!(f, "{function} {argument}")
            }
            Expression::ApplyInfix(Apply { function, argument }) => {
                write!(f, "{argument} {function}")
            }
            Expression::Let(Let { bound, function }) => write!(
                f,
                "let {} = {} in {}",
                function.parameter, bound, function.body
            ),
            Expression::Function(function) => write!(f, "{function}"),
            Expression::Group(inner) => write!(f, "({inner})"),
        }
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parameter_type {
            Some(ty) => write!(f, "\\{} ({}) -> {}", self.parameter, ty, self.body),
            None => write!(f, "\\{} -> {}", self.parameter, self.body),
        }
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Number(number) => f.write_str(&format_number(*number)),
            Primitive::String(string) => write!(f, "`{string}`"),
            Primitive::Bool(value) => write!(f, "{value}"),
            Primitive::Null => f.write_str("null"),
        }
    }
}

/// Shortest round-trippable form; integral values print without a fraction
/// and non-finite values print as `null`, like JSON.
pub fn format_number(number: f64) -> String {
    if number.is_finite() {
        format!("{number}")
    } else {
        "null".to_string()
    }
}

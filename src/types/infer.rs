//! Derives the type-level mirror of an expression.

use crate::ast::{Apply, Expression, Function, Let, Primitive};

use super::env::TypeEnvironment;
use super::error::TypeError;
use super::ty::{FunctionType, Type, TypeExpr};

/// Parameter type of lambdas without an annotation.
const UNANNOTATED: &str = "any";

impl Expression {
    /// The type expression computing this expression's type.
    ///
    /// Identifiers become `typeof` lookups, so the result is only meaningful
    /// in a type environment that binds the same names as the value
    /// environment.
    pub fn type_expression(&self) -> TypeExpr {
        match self {
            Expression::Primitive(primitive) => TypeExpr::named(primitive_type(primitive)),
            Expression::List(_) => TypeExpr::named("list"),
            Expression::Identifier(name) => TypeExpr::type_of(name.as_str()),
            Expression::InfixIdentifier(operator) => TypeExpr::type_of(format!("({operator})")),
            Expression::Apply(Apply { function, argument })
            | Expression::ApplyInfix(Apply { function, argument }) => {
                TypeExpr::apply(function.type_expression(), argument.type_expression())
            }
            Expression::Let(Let { bound, function }) => TypeExpr::Let {
                label: function.parameter.clone(),
                function: FunctionType::new(bound.type_expression(), function.body.type_expression()),
            },
            Expression::Function(function) => function_type(function),
            Expression::Group(inner) => inner.type_expression(),
        }
    }

    /// Compute the type of this expression, failing on the first argument
    /// whose type the function does not accept.
    pub fn check_type(&self, env: &TypeEnvironment) -> Result<Type, TypeError> {
        env.evaluate(&self.type_expression())
    }
}

fn primitive_type(primitive: &Primitive) -> &'static str {
    match primitive {
        Primitive::Number(_) => "number",
        Primitive::String(_) => "string",
        Primitive::Bool(_) => "boolean",
        Primitive::Null => "null",
    }
}

fn function_type(function: &Function) -> TypeExpr {
    let parameter = function
        .parameter_type
        .clone()
        .unwrap_or_else(|| TypeExpr::named(UNANNOTATED));
    TypeExpr::labeled(
        function.parameter.as_str(),
        parameter,
        function.body.type_expression(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_of_infix_application() {
        let expr = Expression::apply(
            Expression::apply_infix(Expression::infix_identifier("+"), Expression::number(1.0)),
            Expression::string("a"),
        );
        assert_eq!(
            expr.type_expression(),
            TypeExpr::apply(
                TypeExpr::apply(TypeExpr::type_of("(+)"), TypeExpr::named("number")),
                TypeExpr::named("string"),
            )
        );
    }

    #[test]
    fn test_unannotated_parameter_is_any() {
        let expr = Expression::function("x", Expression::identifier("x"));
        assert_eq!(
            expr.type_expression(),
            TypeExpr::labeled("x", TypeExpr::named("any"), TypeExpr::type_of("x"))
        );
    }

    #[test]
    fn test_group_is_transparent() {
        let expr = Expression::group(Expression::boolean(true));
        assert_eq!(expr.type_expression(), TypeExpr::named("boolean"));
    }
}

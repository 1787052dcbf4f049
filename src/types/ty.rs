use std::fmt;
use std::sync::Arc;

use super::env::TypeEnvironment;
use super::registry::TypeId;

/// A type-level expression, evaluated against a [`TypeEnvironment`].
///
/// Each expression node has a counterpart here; see
/// [`crate::ast::Expression::type_expression`].
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// A named type from the registry: `number`.
    Identifier(String),
    /// The type currently bound to an identifier: `typeof x`.
    StateIdentifier(String),
    Function(FunctionType),
    /// A function type whose parameter name is bound to the argument type
    /// while the result type is computed.
    FunctionLabeled(String, FunctionType),
    /// `let label = parameter in body` at the type level.
    Let {
        label: String,
        function: FunctionType,
    },
    Apply(Box<TypeExpr>, Box<TypeExpr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    pub parameter: Box<TypeExpr>,
    /// Evaluated on application only.
    pub body: Arc<TypeExpr>,
}

impl FunctionType {
    pub fn new(parameter: TypeExpr, body: TypeExpr) -> Self {
        Self {
            parameter: Box::new(parameter),
            body: Arc::new(body),
        }
    }
}

impl TypeExpr {
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Identifier(name.into())
    }

    pub fn type_of(name: impl Into<String>) -> Self {
        TypeExpr::StateIdentifier(name.into())
    }

    pub fn function(parameter: TypeExpr, body: TypeExpr) -> Self {
        TypeExpr::Function(FunctionType::new(parameter, body))
    }

    pub fn labeled(label: impl Into<String>, parameter: TypeExpr, body: TypeExpr) -> Self {
        TypeExpr::FunctionLabeled(label.into(), FunctionType::new(parameter, body))
    }

    pub fn apply(function: TypeExpr, argument: TypeExpr) -> Self {
        TypeExpr::Apply(Box::new(function), Box::new(argument))
    }

    fn is_function(&self) -> bool {
        matches!(self, TypeExpr::Function(_) | TypeExpr::FunctionLabeled(..))
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Identifier(name) => f.write_str(name),
            TypeExpr::StateIdentifier(name) => write!(f, "typeof {name}"),
            TypeExpr::Function(function) => write!(f, "{function}"),
            TypeExpr::FunctionLabeled(label, function) => write!(
                f,
                "({label}: {}) -> {}",
                function.parameter, function.body
            ),
            TypeExpr::Let { label, function } => write!(
                f,
                "let {label} = {} in {}",
                function.parameter, function.body
            ),
            TypeExpr::Apply(function, argument) => match argument.as_ref() {
                TypeExpr::Identifier(_) => write!(f, "{function} {argument}"),
                _ => write!(f, "{function} ({argument})"),
            },
        }
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.parameter.is_function() {
            write!(f, "({}) -> {}", self.parameter, self.body)
        } else {
            write!(f, "{} -> {}", self.parameter, self.body)
        }
    }
}

/// The result of evaluating a [`TypeExpr`].
#[derive(Debug, Clone)]
pub enum Type {
    Named(TypeId),
    Function(Arc<TypeClosure>),
}

/// A function type together with the environment it was evaluated in.
#[derive(Debug)]
pub struct TypeClosure {
    pub label: Option<String>,
    pub parameter: Type,
    pub body: Arc<TypeExpr>,
    pub env: TypeEnvironment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_display() {
        let ty = TypeExpr::function(
            TypeExpr::function(TypeExpr::named("number"), TypeExpr::named("string")),
            TypeExpr::named("boolean"),
        );
        assert_eq!(ty.to_string(), "(number -> string) -> boolean");

        let curried = TypeExpr::function(
            TypeExpr::named("number"),
            TypeExpr::function(TypeExpr::named("number"), TypeExpr::named("number")),
        );
        assert_eq!(curried.to_string(), "number -> number -> number");
    }

    #[test]
    fn test_state_identifier_display() {
        let ty = TypeExpr::labeled("x", TypeExpr::named("any"), TypeExpr::type_of("x"));
        assert_eq!(ty.to_string(), "(x: any) -> typeof x");
    }
}

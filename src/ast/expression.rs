use std::sync::Arc;

use crate::types::TypeExpr;

/// A node of the expression language.
///
/// The node set is closed; every node owns its children and the tree is
/// acyclic. Trees are immutable once built and can be evaluated any number
/// of times.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Primitive(Primitive),
    List(Vec<Expression>),
    Identifier(String),
    /// An operator used between two operands. Evaluates by looking up the
    /// parenthesised name, so `+` resolves `(+)`.
    InfixIdentifier(String),
    Apply(Apply),
    /// The partial application `(OP lhs)` produced by `lhs OP rhs`. Behaves
    /// exactly like [`Expression::Apply`] and only renders differently.
    ApplyInfix(Apply),
    Let(Let),
    Function(Function),
    Group(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Number(f64),
    String(String),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Apply {
    pub function: Box<Expression>,
    pub argument: Box<Expression>,
}

/// A one-parameter lambda.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub parameter: String,
    /// Declared parameter type, if the source annotated one.
    pub parameter_type: Option<TypeExpr>,
    /// Shared with the closures created when the function is evaluated.
    pub body: Arc<Expression>,
}

/// `let name = bound in body`, sugar for `(\name -> body) bound`.
#[derive(Debug, Clone, PartialEq)]
pub struct Let {
    pub bound: Box<Expression>,
    pub function: Function,
}

impl Expression {
    pub fn number(value: f64) -> Self {
        Expression::Primitive(Primitive::Number(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expression::Primitive(Primitive::String(value.into()))
    }

    pub fn boolean(value: bool) -> Self {
        Expression::Primitive(Primitive::Bool(value))
    }

    pub fn null() -> Self {
        Expression::Primitive(Primitive::Null)
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Expression::Identifier(name.into())
    }

    pub fn infix_identifier(name: impl Into<String>) -> Self {
        Expression::InfixIdentifier(name.into())
    }

    pub fn apply(function: Expression, argument: Expression) -> Self {
        Expression::Apply(Apply {
            function: Box::new(function),
            argument: Box::new(argument),
        })
    }

    /// `lhs OP rhs` is `apply(apply_infix(OP, lhs), rhs)`.
    pub fn apply_infix(operator: Expression, lhs: Expression) -> Self {
        Expression::ApplyInfix(Apply {
            function: Box::new(operator),
            argument: Box::new(lhs),
        })
    }

    pub fn function(parameter: impl Into<String>, body: Expression) -> Self {
        Expression::Function(Function::new(parameter, None, body))
    }

    pub fn let_in(name: impl Into<String>, bound: Expression, body: Expression) -> Self {
        Expression::Let(Let {
            bound: Box::new(bound),
            function: Function::new(name, None, body),
        })
    }

    pub fn group(inner: Expression) -> Self {
        Expression::Group(Box::new(inner))
    }
}

impl Function {
    pub fn new(
        parameter: impl Into<String>,
        parameter_type: Option<TypeExpr>,
        body: Expression,
    ) -> Self {
        Self {
            parameter: parameter.into(),
            parameter_type,
            body: Arc::new(body),
        }
    }
}

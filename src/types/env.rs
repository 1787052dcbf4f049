use std::sync::Arc;

use im::HashMap;

use crate::depth::{DepthGuard, MAX_DEPTH};

use super::error::TypeError;
use super::registry::TypeRegistry;
use super::ty::{FunctionType, Type, TypeClosure, TypeExpr};

/// Identifier → type bindings plus the registry of named types.
///
/// Mirrors [`crate::interpreter::Environment`] one level up: binding never
/// affects clones taken earlier.
#[derive(Debug, Clone)]
pub struct TypeEnvironment {
    bindings: HashMap<String, Type>,
    registry: Arc<TypeRegistry>,
}

impl TypeEnvironment {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            bindings: HashMap::new(),
            registry,
        }
    }

    /// An empty environment over [`TypeRegistry::standard`].
    pub fn standard() -> Self {
        Self::new(Arc::new(TypeRegistry::standard()))
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn lookup(&self, name: &str) -> Option<&Type> {
        self.bindings.get(name)
    }

    pub fn bind(&mut self, name: impl Into<String>, ty: Type) {
        self.bindings.insert(name.into(), ty);
    }

    /// A copy of this environment with one more binding.
    pub fn with(&self, name: impl Into<String>, ty: Type) -> Self {
        let mut env = self.clone();
        env.bind(name, ty);
        env
    }

    /// The registered type called `name`.
    pub fn named(&self, name: &str) -> Result<Type, TypeError> {
        self.registry
            .lookup(name)
            .map(Type::Named)
            .ok_or_else(|| TypeError::UnknownType {
                name: name.to_string(),
            })
    }

    pub fn describe(&self, ty: &Type) -> String {
        self.registry.describe(ty)
    }

    pub fn evaluate(&self, expr: &TypeExpr) -> Result<Type, TypeError> {
        let _guard = DepthGuard::enter().ok_or(TypeError::DepthExceeded { limit: MAX_DEPTH })?;
        match expr {
            TypeExpr::Identifier(name) => self.named(name),
            TypeExpr::StateIdentifier(name) => {
                self.lookup(name)
                    .cloned()
                    .ok_or_else(|| TypeError::UnboundIdentifier {
                        name: name.clone(),
                    })
            }
            TypeExpr::Function(function) => self.closure(None, function),
            TypeExpr::FunctionLabeled(label, function) => {
                self.closure(Some(label.clone()), function)
            }
            TypeExpr::Apply(function, argument) => {
                let function = self.evaluate(function)?;
                let argument = self.evaluate(argument)?;
                self.apply(&function, &argument)
            }
            TypeExpr::Let { label, function } => {
                let bound = self.evaluate(&function.parameter)?;
                self.with(label.clone(), bound).evaluate(&function.body)
            }
        }
    }

    /// Check `argument` against the parameter of `function` and compute the
    /// result type.
    pub fn apply(&self, function: &Type, argument: &Type) -> Result<Type, TypeError> {
        let Type::Function(closure) = function else {
            return Err(TypeError::NotAFunction {
                found: self.describe(function),
            });
        };

        let argument = self.registry.reduce(&closure.parameter, argument)?;
        tracing::trace!(
            parameter = %self.describe(&closure.parameter),
            argument = %self.describe(&argument),
            "applying function type"
        );

        match &closure.label {
            Some(label) => closure.env.with(label.clone(), argument).evaluate(&closure.body),
            None => closure.env.evaluate(&closure.body),
        }
    }

    fn closure(&self, label: Option<String>, function: &FunctionType) -> Result<Type, TypeError> {
        let parameter = self.evaluate(&function.parameter)?;
        Ok(Type::Function(Arc::new(TypeClosure {
            label,
            parameter,
            body: Arc::clone(&function.body),
            env: self.clone(),
        })))
    }
}

//! Named types and the structural matcher.
//!
//! Definitions live in an arena and refer to each other by [`TypeId`], so a
//! type may list itself (directly or through others) among its children.
//! Identity of named types is identity of ids.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use super::error::TypeError;
use super::ty::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(usize);

type Matcher = Arc<dyn Fn(&Type) -> bool + Send + Sync>;

pub struct TypeDefinition {
    pub name: String,
    /// Types accepted wherever this one is expected.
    pub children: Vec<TypeId>,
    matcher: Option<Matcher>,
}

impl TypeDefinition {
    /// Whether the custom matcher, if any, accepts `actual`.
    pub fn matches(&self, actual: &Type) -> bool {
        self.matcher.as_ref().is_some_and(|matcher| matcher(actual))
    }
}

impl fmt::Debug for TypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDefinition")
            .field("name", &self.name)
            .field("children", &self.children)
            .field("matcher", &self.matcher.is_some())
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct TypeRegistry {
    definitions: Vec<TypeDefinition>,
    names: HashMap<String, TypeId>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `any` (accepts everything), `number`, `string`, `boolean`, `null`
    /// and `list`.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.define_with_matcher("any", |_| true);
        for name in ["number", "string", "boolean", "null", "list"] {
            registry.define(name);
        }
        registry
    }

    /// Declare a new type. A later definition with the same name shadows
    /// the earlier one for [`TypeRegistry::lookup`].
    pub fn define(&mut self, name: impl Into<String>) -> TypeId {
        self.insert(name.into(), None)
    }

    pub fn define_with_matcher<F>(&mut self, name: impl Into<String>, matcher: F) -> TypeId
    where
        F: Fn(&Type) -> bool + Send + Sync + 'static,
    {
        let matcher: Matcher = Arc::new(matcher);
        self.insert(name.into(), Some(matcher))
    }

    fn insert(&mut self, name: String, matcher: Option<Matcher>) -> TypeId {
        let id = TypeId(self.definitions.len());
        self.names.insert(name.clone(), id);
        self.definitions.push(TypeDefinition {
            name,
            children: Vec::new(),
            matcher,
        });
        id
    }

    /// Make `child` acceptable wherever `parent` is expected.
    pub fn add_child(&mut self, parent: TypeId, child: TypeId) {
        if let Some(definition) = self.definitions.get_mut(parent.0) {
            definition.children.push(child);
        }
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.names.get(name).copied()
    }

    pub fn get(&self, id: TypeId) -> Option<&TypeDefinition> {
        self.definitions.get(id.0)
    }

    pub fn name(&self, id: TypeId) -> &str {
        self.get(id).map_or("?", |definition| definition.name.as_str())
    }

    /// Human-readable form of a type.
    pub fn describe(&self, ty: &Type) -> String {
        match ty {
            Type::Named(id) => self.name(*id).to_string(),
            Type::Function(closure) => {
                let parameter = self.describe(&closure.parameter);
                match &closure.label {
                    Some(label) => format!("({label}: {parameter}) -> {}", closure.body),
                    None => format!("{parameter} -> {}", closure.body),
                }
            }
        }
    }

    /// Check that `actual` can be used where `expected` is required,
    /// yielding `actual` on success.
    ///
    /// A named type accepts itself, whatever its matcher accepts, and
    /// whatever any of its children accept. A function type accepts another
    /// function type whose parameter type accepts its own parameter type.
    pub fn reduce(&self, expected: &Type, actual: &Type) -> Result<Type, TypeError> {
        let accepted = match (expected, actual) {
            (Type::Named(id), _) => self.accepts(*id, actual, &mut HashSet::new()),
            (Type::Function(expected_fn), Type::Function(actual_fn)) => {
                Arc::ptr_eq(expected_fn, actual_fn)
                    || self
                        .reduce(&actual_fn.parameter, &expected_fn.parameter)
                        .is_ok()
            }
            (Type::Function(_), Type::Named(_)) => false,
        };

        if accepted {
            Ok(actual.clone())
        } else {
            Err(TypeError::Mismatch {
                expected: self.describe(expected),
                actual: self.describe(actual),
            })
        }
    }

    fn accepts(&self, expected: TypeId, actual: &Type, visited: &mut HashSet<TypeId>) -> bool {
        if !visited.insert(expected) {
            return false;
        }
        if matches!(actual, Type::Named(id) if *id == expected) {
            return true;
        }

        let Some(definition) = self.get(expected) else {
            return false;
        };
        definition.matches(actual)
            || definition
                .children
                .iter()
                .any(|child| self.accepts(*child, actual, visited))
    }
}

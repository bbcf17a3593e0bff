//! Discovery exclusion sets.

use std::any::TypeId;
use std::collections::HashSet;

use super::TypeKey;

/// Types and namespaces to skip while discovering an assembly.
///
/// A candidate type is excluded iff its identity is in `types` or its
/// namespace (Rust module path) is in `namespaces`. Mutation is a
/// registration-phase activity; serving-phase access goes through shared
/// borrows.
#[derive(Debug, Default, Clone)]
pub struct Exclusions {
    types: HashSet<TypeId>,
    namespaces: HashSet<String>,
}

impl Exclusions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Excludes a single type.
    pub fn exclude_type<T: 'static>(&mut self) -> &mut Self {
        self.types.insert(TypeId::of::<T>());
        self
    }

    /// Excludes every type declared under `namespace`.
    pub fn exclude_namespace(&mut self, namespace: impl Into<String>) -> &mut Self {
        self.namespaces.insert(namespace.into());
        self
    }

    pub fn is_excluded(&self, key: &TypeKey) -> bool {
        self.types.contains(&key.type_id()) || self.namespaces.contains(key.namespace())
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.namespaces.is_empty()
    }
}

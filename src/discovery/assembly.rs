//! Assemblies: enumerable collections of resource types.
//!
//! An assembly is the loadable-unit analog for discovery, a registry of
//! resource types that can be swept in one registration call. Entries are
//! kept in declaration order because that order fixes dispatch order.

use tracing::trace;

use crate::route::Route;

use super::{discover_type, DiscoveryError, Exclusions, Resource, TypeKey};

/// An ordered registry of resource types.
pub struct Assembly {
    name: String,
    entries: Vec<AssemblyEntry>,
}

struct AssemblyEntry {
    key: TypeKey,
    discover: fn(&str) -> Result<Vec<Route>, DiscoveryError>,
}

impl Assembly {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), entries: Vec::new() }
    }

    /// Adds a resource type to the registry.
    pub fn with<T: Resource>(mut self) -> Self {
        self.entries.push(AssemblyEntry { key: TypeKey::of::<T>(), discover: discover_type::<T> });
        self
    }

    /// Discovers routes from every non-excluded entry, in declaration
    /// order.
    pub fn discover(&self, scope: &str, exclusions: &Exclusions) -> Result<Vec<Route>, DiscoveryError> {
        let mut routes = Vec::new();
        for entry in &self.entries {
            if exclusions.is_excluded(&entry.key) {
                trace!(assembly = %self.name, candidate = entry.key.short_name(), "candidate excluded");
                continue;
            }
            routes.extend((entry.discover)(scope)?);
        }
        Ok(routes)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! The ordered, deduplicated route collection.

use tracing::{trace, warn};

use crate::protocol::HttpContext;
use crate::route::Route;

/// An ordered sequence of routes with no two entries sharing an identity.
///
/// Insertion order is preserved and is the dispatch order; there are no
/// precedence rules beyond first-registered-wins. The table is mutated
/// during the registration phase only and is read-only while serving.
#[derive(Debug, Default, Clone)]
pub struct RoutingTable {
    routes: Vec<Route>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `route` unless a route with the same identity is already
    /// present. Duplicates are dropped silently so that importing the same
    /// router twice (or along two composition paths) stays idempotent.
    ///
    /// Returns true iff the route was appended.
    pub fn register(&mut self, route: Route) -> bool {
        if self.routes.iter().any(|existing| existing.identity() == route.identity()) {
            trace!(route = %route.name(), "duplicate route ignored");
            return false;
        }
        trace!(route = %route.name(), method = %route.method(), pattern = route.pattern().source(), "route registered");
        self.routes.push(route);
        true
    }

    /// Appends each of `other`'s routes in order, deduplicating against
    /// this table.
    pub fn import(&mut self, other: &RoutingTable) {
        for route in &other.routes {
            self.register(route.clone());
        }
    }

    /// The enabled routes matching `ctx`, in registration order.
    pub fn route_for(&self, ctx: &HttpContext) -> Vec<&Route> {
        self.routes
            .iter()
            .filter(|route| route.is_enabled() && route.matches(ctx))
            .collect()
    }

    /// Read-only view of every registered route, in registration order.
    pub fn routes(&self) -> &[Route] {
        self.routes.as_slice()
    }

    /// Flips the enabled flag on every route named `name`; returns how
    /// many routes were affected.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> usize {
        let mut changed = 0;
        for route in &mut self.routes {
            if route.name() == name {
                route.set_enabled(enabled);
                changed += 1;
            }
        }
        if changed == 0 {
            warn!(route = name, "set_enabled matched no routes");
        }
        changed
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

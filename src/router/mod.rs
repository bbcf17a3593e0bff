//! The router facade: fluent registration and the serving entry point.
//!
//! Registration is a build-time activity on a [`RouterBuilder`]; the
//! built [`Router`] is immutable and its [`route`](Router::route) entry
//! point is safe to call concurrently from many request threads. The
//! builder owns the routing table, the exclusion set, the scope label and
//! the before/after hooks, and hands them to the dispatcher at
//! [`build`](RouterBuilder::build).

mod dispatch;
pub use dispatch::Dispatcher;
pub use dispatch::RouteError;

mod table;
pub use table::RoutingTable;

use std::sync::Arc;

use crate::discovery::{discover_method, discover_type, Assembly, DiscoveryError, Exclusions, Resource};
use crate::protocol::{HttpContext, HttpMethod};
use crate::route::{Handler, PatternError, Route};

/// A type that packages a pre-configured router, typically one router
/// per application module. Imported with
/// [`RouterBuilder::import_module`].
pub trait RouterModule {
    fn build() -> Result<Router, DiscoveryError>;
}

/// The immutable, serving-phase router.
pub struct Router {
    table: RoutingTable,
    dispatcher: Dispatcher,
    exclusions: Exclusions,
    scope: String,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Builder entry point that hands a scoped builder to a configuration
    /// function and returns the built router.
    ///
    /// ```
    /// use trellis::{handler_fn, Router};
    ///
    /// let router = Router::configure("api", |builder| {
    ///     builder.get("/ping", handler_fn(|ctx| {
    ///         ctx.set_responded(true);
    ///         Ok(())
    ///     }))
    /// })
    /// .unwrap();
    /// assert_eq!(router.routes().len(), 1);
    /// ```
    pub fn configure<F, E>(scope: impl Into<String>, config: F) -> Result<Router, E>
    where
        F: FnOnce(RouterBuilder) -> Result<RouterBuilder, E>,
    {
        Ok(config(Router::builder().scope(scope))?.build())
    }

    /// Routes one request through the dispatch lifecycle.
    ///
    /// Returns the context as left by the handlers; its responded flag
    /// tells the caller whether a response was committed. Unmatched
    /// requests surface as [`RouteError::NotFound`].
    pub fn route(&self, ctx: HttpContext) -> Result<HttpContext, RouteError> {
        self.dispatcher.dispatch(&self.table, ctx)
    }

    pub fn routes(&self) -> &[Route] {
        self.table.routes()
    }

    pub fn exclusions(&self) -> &Exclusions {
        &self.exclusions
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub(crate) fn table(&self) -> &RoutingTable {
        &self.table
    }
}

macro_rules! method_route {
    ($method:ident, $variant:ident) => {
        #[doc = concat!("Registers `handler` for ", stringify!($variant), " requests matching `pattern`.")]
        pub fn $method<H: Handler + 'static>(self, pattern: &str, handler: H) -> Result<Self, PatternError> {
            self.route(HttpMethod::$variant, pattern, handler)
        }
    };
}

/// The mutable, registration-phase side of a router.
pub struct RouterBuilder {
    table: RoutingTable,
    exclusions: Exclusions,
    scope: String,
    before: Option<Arc<dyn Handler>>,
    after: Option<Arc<dyn Handler>>,
    continue_after_response: bool,
}

impl RouterBuilder {
    fn new() -> Self {
        Self {
            table: RoutingTable::new(),
            exclusions: Exclusions::new(),
            scope: String::new(),
            before: None,
            after: None,
            continue_after_response: false,
        }
    }

    /// Sets the scope label matched against resource scopes during
    /// discovery. Set it before registering resources or assemblies; the
    /// empty scope accepts every resource.
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Sets the hook invoked before the first matched handler.
    pub fn before<H: Handler + 'static>(mut self, hook: H) -> Self {
        self.before = Some(Arc::new(hook));
        self
    }

    /// Sets the hook invoked after the route loop, even when a handler
    /// failed.
    pub fn after<H: Handler + 'static>(mut self, hook: H) -> Self {
        self.after = Some(Arc::new(hook));
        self
    }

    /// When set, matched routes keep being invoked after a response has
    /// been committed. Defaults to off.
    pub fn continue_after_response(mut self, continue_after_response: bool) -> Self {
        self.continue_after_response = continue_after_response;
        self
    }

    /// Registers a pre-built route; duplicates are dropped silently.
    pub fn register(mut self, route: Route) -> Self {
        self.table.register(route);
        self
    }

    /// Registers `handler` for requests whose verb passes `method` and
    /// whose path matches `pattern`.
    pub fn route<H: Handler + 'static>(
        self,
        method: HttpMethod,
        pattern: &str,
        handler: H,
    ) -> Result<Self, PatternError> {
        let route = Route::new(method, pattern, handler)?;
        Ok(self.register(route))
    }

    method_route!(get, Get);
    method_route!(post, Post);
    method_route!(put, Put);
    method_route!(delete, Delete);
    method_route!(head, Head);
    method_route!(options, Options);
    method_route!(connect, Connect);
    method_route!(patch, Patch);
    method_route!(trace, Trace);

    /// Registers `handler` for every request, regardless of verb or
    /// path.
    pub fn handler<H: Handler + 'static>(self, handler: H) -> Self {
        self.register(Route::match_all(handler))
    }

    /// Discovers and registers the routes declared by one resource type.
    pub fn resource<T: Resource>(mut self) -> Result<Self, DiscoveryError> {
        for route in discover_type::<T>(&self.scope)? {
            self.table.register(route);
        }
        Ok(self)
    }

    /// Discovers and registers the routes of one named handler method of
    /// a resource type.
    pub fn resource_method<T: Resource>(mut self, method_name: &str) -> Result<Self, DiscoveryError> {
        for route in discover_method::<T>(&self.scope, method_name)? {
            self.table.register(route);
        }
        Ok(self)
    }

    /// Discovers and registers every non-excluded resource of an
    /// assembly.
    pub fn assembly(mut self, assembly: &Assembly) -> Result<Self, DiscoveryError> {
        for route in assembly.discover(&self.scope, &self.exclusions)? {
            self.table.register(route);
        }
        Ok(self)
    }

    /// Imports another router's routes in their registration order,
    /// deduplicating against this builder's table.
    pub fn import(mut self, other: &Router) -> Self {
        self.table.import(other.table());
        self
    }

    /// Builds a [`RouterModule`]'s router and imports its routes.
    pub fn import_module<M: RouterModule>(self) -> Result<Self, DiscoveryError> {
        let other = M::build()?;
        Ok(self.import(&other))
    }

    /// Excludes a type from subsequent assembly discovery.
    pub fn exclude_type<T: 'static>(mut self) -> Self {
        self.exclusions.exclude_type::<T>();
        self
    }

    /// Excludes a namespace from subsequent assembly discovery.
    pub fn exclude_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.exclusions.exclude_namespace(namespace);
        self
    }

    /// Flips the enabled flag on every registered route named `name`.
    pub fn set_enabled(mut self, name: &str, enabled: bool) -> Self {
        self.table.set_enabled(name, enabled);
        self
    }

    /// Freezes the configuration into an immutable, serving-ready
    /// [`Router`].
    pub fn build(self) -> Router {
        Router {
            table: self.table,
            dispatcher: Dispatcher::new(self.before, self.after, self.continue_after_response),
            exclusions: self.exclusions,
            scope: self.scope,
        }
    }
}

//! Routes: the unit entries of a routing table.
//!
//! A [`Route`] binds a method filter and a compiled [`PathPattern`] to a
//! [`Handler`], together with a human label and an enabled flag. Routes
//! carry an identity (method, pattern source, handler identity) that the
//! routing table uses to deduplicate registrations.

mod handler;
pub use handler::handler_fn;
pub use handler::BoxError;
pub use handler::Handler;
pub use handler::HandlerFn;
pub use handler::HandlerId;

mod pattern;
pub use pattern::PathPattern;
pub use pattern::PatternError;

use std::any::type_name;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::protocol::{HttpContext, HttpMethod};

/// One entry of a routing table.
#[derive(Clone)]
pub struct Route {
    method: HttpMethod,
    pattern: PathPattern,
    handler: Arc<dyn Handler>,
    name: String,
    enabled: bool,
    handler_id: HandlerId,
}

/// The deduplication identity of a route.
///
/// Two routes are equal iff their identities are equal; the route name and
/// enabled flag do not participate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteIdentity {
    method: HttpMethod,
    pattern: String,
    handler: HandlerId,
}

impl Route {
    /// Creates a route from a pattern string and a handler.
    ///
    /// The route name defaults to the handler's type path and can be
    /// replaced with [`with_name`](Self::with_name).
    pub fn new<H>(method: HttpMethod, pattern: &str, handler: H) -> Result<Self, PatternError>
    where
        H: Handler + 'static,
    {
        let pattern = PathPattern::compile(pattern)?;
        let name = type_name::<H>().to_string();
        Ok(Self::from_arc(method, pattern, Arc::new(handler), None, name))
    }

    /// Creates a route that matches every request, regardless of verb or
    /// path. This is the direct-function registration shape.
    pub fn match_all<H>(handler: H) -> Self
    where
        H: Handler + 'static,
    {
        let name = type_name::<H>().to_string();
        Self::from_arc(HttpMethod::All, PathPattern::match_all(), Arc::new(handler), None, name)
    }

    /// Creates a route whose handler was bound to a resource method during
    /// discovery. The identity uses the declaring type and method name so
    /// re-discovery of the same resource deduplicates.
    pub(crate) fn bound(
        method: HttpMethod,
        pattern: PathPattern,
        handler: Arc<dyn Handler>,
        type_name: &'static str,
        method_name: &'static str,
        name: String,
    ) -> Self {
        let id = HandlerId::Bound { type_name, method: method_name };
        Self::from_arc(method, pattern, handler, Some(id), name)
    }

    fn from_arc(
        method: HttpMethod,
        pattern: PathPattern,
        handler: Arc<dyn Handler>,
        id: Option<HandlerId>,
        name: String,
    ) -> Self {
        let handler_id =
            id.unwrap_or_else(|| HandlerId::Address(Arc::as_ptr(&handler) as *const () as usize));
        Self { method, pattern, handler, name, enabled: true, handler_id }
    }

    /// Replaces the route's human label.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// True iff the route's method filter accepts the request verb and the
    /// pattern matches the request path.
    pub fn matches(&self, ctx: &HttpContext) -> bool {
        self.method.accepts(ctx.request().method()) && self.pattern.matches(ctx.request().path()).is_some()
    }

    /// Invokes the handler, first merging the pattern's captured
    /// parameters into the request (overwriting same-named keys).
    pub fn invoke(&self, ctx: &mut HttpContext) -> Result<(), BoxError> {
        if let Some(captured) = self.pattern.matches(ctx.request().path()) {
            ctx.request_mut().params_mut().extend(captured);
        }
        self.handler.invoke(ctx)
    }

    pub fn identity(&self) -> RouteIdentity {
        RouteIdentity {
            method: self.method,
            pattern: self.pattern.source().to_string(),
            handler: self.handler_id.clone(),
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabled routes stay in the table but never match. Mutation is a
    /// registration-phase activity.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Route {}

impl Debug for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern.source())
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .finish()
    }
}

//! The declarative route metadata carried by resource types.
//!
//! Rust has no runtime annotation reflection, so resources describe
//! themselves programmatically: a type implements [`Resource`], names its
//! base path and scope in a [`ResourceInfo`], and lists its handler
//! methods as [`HandlerInfo`] entries, each tagged with one or more
//! [`RouteInfo`] route declarations. Discovery reads these tables the way
//! an annotation scanner would read attributes, in declared order.

use crate::protocol::HttpContext;
use crate::protocol::HttpMethod;
use crate::route::BoxError;

/// Type-level metadata: the base path prepended to every route of the
/// resource, and the scope label that partitions resources between
/// routers sharing an assembly.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceInfo {
    pub base_path: &'static str,
    pub scope: &'static str,
}

impl ResourceInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_path(mut self, base_path: &'static str) -> Self {
        self.base_path = base_path;
        self
    }

    pub fn scope(mut self, scope: &'static str) -> Self {
        self.scope = scope;
        self
    }
}

/// One route declaration on a handler method.
///
/// The method filter defaults to `All` and the path info to the empty
/// string; a method may carry several declarations, each producing a
/// distinct route.
#[derive(Debug, Clone, Copy)]
pub struct RouteInfo {
    pub method: HttpMethod,
    pub path_info: &'static str,
}

impl Default for RouteInfo {
    fn default() -> Self {
        Self { method: HttpMethod::All, path_info: "" }
    }
}

impl RouteInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn path(mut self, path_info: &'static str) -> Self {
        self.path_info = path_info;
        self
    }
}

/// An instance method of a resource together with its route declarations.
pub struct HandlerInfo<T> {
    pub(crate) name: &'static str,
    pub(crate) routes: Vec<RouteInfo>,
    pub(crate) invoke: fn(&T, &mut HttpContext) -> Result<(), BoxError>,
}

impl<T> HandlerInfo<T> {
    pub fn new(name: &'static str, invoke: fn(&T, &mut HttpContext) -> Result<(), BoxError>) -> Self {
        Self { name, routes: Vec::new(), invoke }
    }

    /// Adds one route declaration; call repeatedly for multi-route
    /// methods.
    pub fn route(mut self, info: RouteInfo) -> Self {
        self.routes.push(info);
        self
    }
}

/// A type whose handler methods are harvested into routes.
///
/// `create` is the zero-argument-constructor contract: discovery builds
/// one receiver per discovery call and binds every harvested handler to
/// it. A construction failure aborts the registration that triggered the
/// discovery.
pub trait Resource: Send + Sync + Sized + 'static {
    fn info() -> ResourceInfo {
        ResourceInfo::default()
    }

    fn create() -> Result<Self, BoxError>;

    /// Handler methods in declared order; within one entry, route
    /// declarations in declared order. This ordering fixes dispatch
    /// order.
    fn handlers() -> Vec<HandlerInfo<Self>>;
}

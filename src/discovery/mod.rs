//! Route discovery: harvesting routes from resource types.
//!
//! Discovery turns the declarative metadata of [`Resource`] types into
//! [`Route`]s. A single type is swept with [`discover_type`]; an
//! [`Assembly`] sweeps many types in declaration order, honoring an
//! [`Exclusions`] set. Each discovered route binds a handler method to a
//! freshly constructed receiver shared by that type's routes.
//!
//! Path assembly follows the metadata shapes: the resource's base path is
//! normalized to a leading-slash, no-trailing-slash form; each route
//! declaration contributes its path info with a guaranteed leading slash;
//! and a declaration written in regex form keeps its `^` in front of the
//! assembled pattern.

mod assembly;
pub use assembly::Assembly;

mod exclusions;
pub use exclusions::Exclusions;

mod resource;
pub use resource::HandlerInfo;
pub use resource::Resource;
pub use resource::ResourceInfo;
pub use resource::RouteInfo;

use std::any::TypeId;
use std::sync::Arc;

use thiserror::Error;
use tracing::{trace, warn};

use crate::protocol::HttpContext;
use crate::route::{handler_fn, BoxError, PathPattern, PatternError, Route};

/// Errors raised while discovering routes from a type or assembly.
///
/// These surface at registration time and are fatal to the registration
/// call that triggered them.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The resource's constructor failed, so its methods cannot be bound.
    #[error("failed to construct resource {type_name}: {source}")]
    Construct {
        type_name: &'static str,
        source: BoxError,
    },

    /// A declared path produced an invalid pattern.
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// Identity of a candidate type: its `TypeId` plus the type path used to
/// derive a namespace for exclusion filtering.
#[derive(Debug, Clone)]
pub struct TypeKey {
    type_id: TypeId,
    type_name: &'static str,
}

impl TypeKey {
    pub fn of<T: 'static>() -> Self {
        Self { type_id: TypeId::of::<T>(), type_name: std::any::type_name::<T>() }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The full type path, e.g. `app::admin::StatusResource`.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The module path of the type: everything before the final `::`.
    pub fn namespace(&self) -> &'static str {
        match self.base().rsplit_once("::") {
            Some((namespace, _)) => namespace,
            None => "",
        }
    }

    /// The bare type name without its module path.
    pub fn short_name(&self) -> &'static str {
        match self.base().rsplit_once("::") {
            Some((_, name)) => name,
            None => self.base(),
        }
    }

    // type path with any generic arguments cut off, so the `::` splits
    // above stay within the path itself
    fn base(&self) -> &'static str {
        match self.type_name.split_once('<') {
            Some((base, _)) => base,
            None => self.type_name,
        }
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeKey {}

/// Harvests the routes declared by one resource type.
///
/// A router `scope` that is non-empty and different from the resource's
/// declared scope yields an empty result. Otherwise one receiver is
/// constructed and every declared handler method is bound to it, one
/// route per route declaration, in declared order.
pub fn discover_type<T: Resource>(scope: &str) -> Result<Vec<Route>, DiscoveryError> {
    discover_filtered::<T>(scope, None)
}

/// Harvests the routes of one named handler method of a resource type.
///
/// This is the single-method registration shape; everything else works
/// like [`discover_type`].
pub fn discover_method<T: Resource>(scope: &str, method_name: &str) -> Result<Vec<Route>, DiscoveryError> {
    let routes = discover_filtered::<T>(scope, Some(method_name))?;
    if routes.is_empty() && (scope.is_empty() || scope == T::info().scope) {
        warn!(
            resource = TypeKey::of::<T>().short_name(),
            method = method_name,
            "no handler method with route declarations matched"
        );
    }
    Ok(routes)
}

fn discover_filtered<T: Resource>(
    scope: &str,
    method_name: Option<&str>,
) -> Result<Vec<Route>, DiscoveryError> {
    let key = TypeKey::of::<T>();
    let info = T::info();

    if !scope.is_empty() && scope != info.scope {
        trace!(
            resource = key.short_name(),
            resource_scope = info.scope,
            router_scope = scope,
            "resource skipped: scope mismatch"
        );
        return Ok(Vec::new());
    }

    let base_path = normalize_base_path(info.base_path);
    let receiver = Arc::new(T::create().map_err(|source| DiscoveryError::Construct {
        type_name: key.type_name(),
        source,
    })?);

    let mut routes = Vec::new();
    for handler in T::handlers() {
        if method_name.is_some_and(|wanted| wanted != handler.name) {
            continue;
        }
        for declared in &handler.routes {
            let source = assemble_pattern(&base_path, declared.path_info);
            let pattern = PathPattern::compile(&source)?;

            let receiver = Arc::clone(&receiver);
            let invoke = handler.invoke;
            let bound = handler_fn(move |ctx: &mut HttpContext| invoke(&receiver, ctx));

            let name = format!("{}::{}", key.short_name(), handler.name);
            routes.push(Route::bound(
                declared.method,
                pattern,
                Arc::new(bound),
                key.type_name(),
                handler.name,
                name,
            ));
        }
    }

    trace!(resource = key.short_name(), routes = routes.len(), "resource discovered");
    Ok(routes)
}

fn normalize_base_path(base_path: &str) -> String {
    if base_path.is_empty() {
        return String::new();
    }
    let trimmed = base_path.trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn assemble_pattern(base_path: &str, path_info: &str) -> String {
    // a regex-form declaration contributes its anchor in front of the
    // whole assembled pattern
    if let Some(rest) = path_info.strip_prefix('^') {
        format!("^{base_path}{}", ensure_leading_slash(rest))
    } else {
        format!("{base_path}{}", ensure_leading_slash(path_info))
    }
}

fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

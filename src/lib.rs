//! Request routing core for embeddable HTTP servers.
//!
//! trellis maps an inbound request to an ordered sequence of handlers and
//! runs them under a before/after lifecycle. It is a library, not a
//! server: the listener layer builds an [`HttpContext`] per request,
//! calls [`Router::route`], and turns the outcome (or a
//! [`RouteError`]) into bytes on a socket.
//!
//! # Overview
//!
//! - [`PathPattern`] compiles literal/parametric (`/users/:id`) and
//!   regex (`^/files/…`) path patterns
//! - [`Route`] pairs a method filter and a pattern with a [`Handler`]
//! - [`RoutingTable`] keeps routes ordered and deduplicated; every
//!   matching enabled route is dispatched, in registration order
//! - [`Resource`] / [`Assembly`] declare routes on user types for
//!   discovery, filtered by [`Exclusions`] and scope
//! - [`Router`] composes the above behind a fluent builder and exposes
//!   the single serving-phase entry point
//!
//! # Example
//!
//! ```
//! use trellis::{handler_fn, HttpContext, HttpMethod, Router};
//!
//! let router = Router::builder()
//!     .get("/greet/:name", handler_fn(|ctx| {
//!         ctx.set_responded(true);
//!         Ok(())
//!     }))
//!     .unwrap()
//!     .build();
//!
//! let ctx = router
//!     .route(HttpContext::new(HttpMethod::Get, "/greet/world"))
//!     .unwrap();
//! assert!(ctx.has_responded());
//! assert_eq!(ctx.request().params().get("name"), Some(&"world".to_string()));
//! ```
//!
//! Registration is single-threaded by construction: only
//! [`RouterBuilder`] mutates state, and [`RouterBuilder::build`] freezes
//! it into an immutable [`Router`] that may serve from many threads.

pub mod discovery;
pub mod protocol;
pub mod route;
pub mod router;

pub use discovery::{Assembly, DiscoveryError, Exclusions, HandlerInfo, Resource, ResourceInfo, RouteInfo};
pub use protocol::{HttpContext, HttpMethod, Request};
pub use route::{handler_fn, BoxError, Handler, PathPattern, PatternError, Route};
pub use router::{Router, RouterBuilder, RouterModule, RouteError, RoutingTable};

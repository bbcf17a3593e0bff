use std::error::Error;

use crate::protocol::HttpContext;

/// Boxed error type surfaced by handlers and hooks.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// A request handler invoked for each matched route.
///
/// Handlers receive the context by exclusive borrow: they mutate it in
/// place (typically marking it responded) or replace it wholesale with
/// `*ctx = replacement`. Returning an `Err` aborts the dispatch loop and
/// propagates to the caller of [`Router::route`](crate::Router::route).
///
/// The `Send + Sync` bound lets one router serve requests from many
/// threads concurrently.
pub trait Handler: Send + Sync {
    fn invoke(&self, ctx: &mut HttpContext) -> Result<(), BoxError>;
}

/// A handler that wraps a closure.
pub struct HandlerFn<F> {
    f: F,
}

impl<F> Handler for HandlerFn<F>
where
    F: Fn(&mut HttpContext) -> Result<(), BoxError> + Send + Sync,
{
    fn invoke(&self, ctx: &mut HttpContext) -> Result<(), BoxError> {
        (self.f)(ctx)
    }
}

/// Creates a [`Handler`] from a closure.
///
/// ```
/// use trellis::handler_fn;
///
/// let handler = handler_fn(|ctx| {
///     ctx.set_responded(true);
///     Ok(())
/// });
/// ```
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: Fn(&mut HttpContext) -> Result<(), BoxError> + Send + Sync,
{
    HandlerFn { f }
}

/// Identity of a handler, used for route deduplication.
///
/// Resource-bound handlers are identified by declaring type and method
/// name; functional handlers by the address of their shared allocation,
/// so clones of one registration compare equal while independently
/// registered closures stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HandlerId {
    Bound {
        type_name: &'static str,
        method: &'static str,
    },
    Address(usize),
}

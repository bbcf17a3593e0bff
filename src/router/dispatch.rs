//! The per-request dispatch lifecycle.
//!
//! Dispatch walks the matched routes in registration order between an
//! optional `before` hook and an optional `after` hook:
//!
//! - zero matched routes fail with [`RouteError::NotFound`] and no hook
//!   runs
//! - a context that already carries a response short-circuits untouched
//! - the first handler to mark the context responded ends the loop,
//!   unless continue-after-response is set (useful for trailing
//!   audit/logging routes)
//! - `after` runs even when a handler failed; the original failure wins

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error};

use crate::protocol::{HttpContext, HttpMethod};
use crate::route::{BoxError, Handler};

use super::table::RoutingTable;

/// Errors surfaced by [`dispatch`](Dispatcher::dispatch).
///
/// The core recovers nothing: the hosting layer decides how these map to
/// HTTP responses (`NotFound` is conventionally a 404).
#[derive(Debug, Error)]
pub enum RouteError {
    /// No enabled route matched the request.
    #[error("no route matches {method} {path}")]
    NotFound { method: HttpMethod, path: String },

    /// A route handler failed.
    #[error("handler of route '{route}' failed: {source}")]
    Handler { route: String, source: BoxError },

    /// The before or after hook failed.
    #[error("{hook} hook failed: {source}")]
    Hook { hook: &'static str, source: BoxError },
}

/// The request lifecycle runner: hooks, ordering and short-circuiting
/// around a routing table.
pub struct Dispatcher {
    before: Option<Arc<dyn Handler>>,
    after: Option<Arc<dyn Handler>>,
    continue_after_response: bool,
}

impl Dispatcher {
    pub fn new(
        before: Option<Arc<dyn Handler>>,
        after: Option<Arc<dyn Handler>>,
        continue_after_response: bool,
    ) -> Self {
        Self { before, after, continue_after_response }
    }

    /// Runs one request through the lifecycle.
    ///
    /// Returns the context as left by the handlers; its responded flag
    /// tells the caller whether a response was committed.
    pub fn dispatch(&self, table: &RoutingTable, mut ctx: HttpContext) -> Result<HttpContext, RouteError> {
        let matched = table.route_for(&ctx);
        if matched.is_empty() {
            debug!(request_id = ctx.request().id(), path = ctx.request().path(), "no route matched");
            return Err(RouteError::NotFound {
                method: ctx.request().method(),
                path: ctx.request().path().to_string(),
            });
        }

        debug!(
            request_id = ctx.request().id(),
            request = ctx.request().name(),
            matched = matched.len(),
            "routing request"
        );

        // a pre-existing response short-circuits the whole lifecycle
        if ctx.has_responded() {
            return Ok(ctx);
        }

        if let Some(before) = &self.before {
            // before sits outside the loop's finally scope: its failure
            // propagates without running after
            before
                .invoke(&mut ctx)
                .map_err(|source| RouteError::Hook { hook: "before", source })?;
        }

        let mut invoked = 0usize;
        let mut failure: Option<RouteError> = None;

        for route in &matched {
            invoked += 1;
            if let Err(source) = route.invoke(&mut ctx) {
                failure = Some(RouteError::Handler { route: route.name().to_string(), source });
                break;
            }
            if self.continue_after_response {
                continue;
            }
            if ctx.has_responded() {
                break;
            }
        }

        if let Some(after) = &self.after {
            if let Err(source) = after.invoke(&mut ctx) {
                if failure.is_some() {
                    // the loop failure is what propagates; the after
                    // failure is only logged
                    error!(cause = %source, "after hook failed while handling a route failure");
                } else {
                    failure = Some(RouteError::Hook { hook: "after", source });
                }
            }
        }

        debug!(
            request_id = ctx.request().id(),
            invoked,
            matched = matched.len(),
            "routing complete"
        );

        match failure {
            Some(err) => Err(err),
            None => Ok(ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::route::{handler_fn, Route};

    fn counting_route(method: HttpMethod, pattern: &str, hits: &Arc<AtomicUsize>) -> Route {
        let hits = Arc::clone(hits);
        Route::new(
            method,
            pattern,
            handler_fn(move |ctx| {
                hits.fetch_add(1, Ordering::SeqCst);
                ctx.set_responded(true);
                Ok(())
            }),
        )
        .unwrap()
    }

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    fn plain_dispatcher() -> Dispatcher {
        Dispatcher::new(None, None, false)
    }

    #[test]
    fn test_literal_match_dispatch() {
        init_tracing();
        let hits = counter();
        let mut table = RoutingTable::new();
        table.register(counting_route(HttpMethod::Get, "/hello", &hits));

        let ctx = plain_dispatcher()
            .dispatch(&table, HttpContext::new(HttpMethod::Get, "/hello"))
            .unwrap();

        assert!(ctx.has_responded());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        let hits = counter();
        let mut table = RoutingTable::new();
        table.register(counting_route(HttpMethod::Get, "/hello", &hits));

        let err = plain_dispatcher()
            .dispatch(&table, HttpContext::new(HttpMethod::Get, "/bye"))
            .unwrap_err();

        assert!(matches!(err, RouteError::NotFound { .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_method_mismatch_is_not_found() {
        let hits = counter();
        let mut table = RoutingTable::new();
        table.register(counting_route(HttpMethod::Get, "/hello", &hits));

        let err = plain_dispatcher()
            .dispatch(&table, HttpContext::new(HttpMethod::Post, "/hello"))
            .unwrap_err();

        assert!(matches!(err, RouteError::NotFound { .. }));
    }

    #[test]
    fn test_parametric_path_reaches_handler() {
        let seen = Arc::new(std::sync::Mutex::new(None));
        let seen_by_handler = Arc::clone(&seen);

        let mut table = RoutingTable::new();
        table.register(
            Route::new(
                HttpMethod::Get,
                "/users/:id",
                handler_fn(move |ctx| {
                    *seen_by_handler.lock().unwrap() = ctx.request().params().get("id").cloned();
                    ctx.set_responded(true);
                    Ok(())
                }),
            )
            .unwrap(),
        );

        plain_dispatcher()
            .dispatch(&table, HttpContext::new(HttpMethod::Get, "/users/42"))
            .unwrap();
        assert_eq!(seen.lock().unwrap().as_deref(), Some("42"));

        let err = plain_dispatcher()
            .dispatch(&table, HttpContext::new(HttpMethod::Get, "/users/42/extra"))
            .unwrap_err();
        assert!(matches!(err, RouteError::NotFound { .. }));
    }

    #[test]
    fn test_first_response_short_circuits() {
        let first = counter();
        let second = counter();
        let mut table = RoutingTable::new();
        table.register(counting_route(HttpMethod::Get, "/a", &first));
        table.register(counting_route(HttpMethod::Get, "/a", &second));

        plain_dispatcher()
            .dispatch(&table, HttpContext::new(HttpMethod::Get, "/a"))
            .unwrap();

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_continue_after_response_runs_all_matched() {
        let first = counter();
        let second = counter();
        let mut table = RoutingTable::new();
        table.register(counting_route(HttpMethod::Get, "/a", &first));
        table.register(counting_route(HttpMethod::Get, "/a", &second));

        Dispatcher::new(None, None, true)
            .dispatch(&table, HttpContext::new(HttpMethod::Get, "/a"))
            .unwrap();

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_hooks_fire_around_failing_handler() {
        let before = counter();
        let after = counter();
        let before_hits = Arc::clone(&before);
        let after_hits = Arc::clone(&after);

        let mut table = RoutingTable::new();
        table.register(
            Route::new(HttpMethod::Get, "/x", handler_fn(|_ctx| Err("boom".into())))
                .unwrap()
                .with_name("explosive"),
        );

        let dispatcher = Dispatcher::new(
            Some(Arc::new(handler_fn(move |_ctx| {
                before_hits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }))),
            Some(Arc::new(handler_fn(move |_ctx| {
                after_hits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }))),
            false,
        );

        let err = dispatcher
            .dispatch(&table, HttpContext::new(HttpMethod::Get, "/x"))
            .unwrap_err();

        assert!(matches!(err, RouteError::Handler { ref route, .. } if route == "explosive"));
        assert_eq!(before.load(Ordering::SeqCst), 1);
        assert_eq!(after.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_pre_responded_context_skips_everything() {
        let hits = counter();
        let before = counter();
        let before_hits = Arc::clone(&before);

        let mut table = RoutingTable::new();
        table.register(counting_route(HttpMethod::Get, "/a", &hits));

        let dispatcher = Dispatcher::new(
            Some(Arc::new(handler_fn(move |_ctx| {
                before_hits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }))),
            None,
            false,
        );

        let mut ctx = HttpContext::new(HttpMethod::Get, "/a");
        ctx.set_responded(true);
        let ctx = dispatcher.dispatch(&table, ctx).unwrap();

        assert!(ctx.has_responded());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(before.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_before_failure_skips_loop_and_after() {
        let hits = counter();
        let after = counter();
        let after_hits = Arc::clone(&after);

        let mut table = RoutingTable::new();
        table.register(counting_route(HttpMethod::Get, "/a", &hits));

        let dispatcher = Dispatcher::new(
            Some(Arc::new(handler_fn(|_ctx| Err("rejected".into())))),
            Some(Arc::new(handler_fn(move |_ctx| {
                after_hits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }))),
            false,
        );

        let err = dispatcher
            .dispatch(&table, HttpContext::new(HttpMethod::Get, "/a"))
            .unwrap_err();

        assert!(matches!(err, RouteError::Hook { hook: "before", .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(after.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_after_failure_is_suppressed_behind_handler_failure() {
        let mut table = RoutingTable::new();
        table.register(
            Route::new(HttpMethod::Get, "/x", handler_fn(|_ctx| Err("boom".into())))
                .unwrap()
                .with_name("explosive"),
        );

        let dispatcher = Dispatcher::new(
            None,
            Some(Arc::new(handler_fn(|_ctx| Err("after also failed".into())))),
            false,
        );

        let err = dispatcher
            .dispatch(&table, HttpContext::new(HttpMethod::Get, "/x"))
            .unwrap_err();

        // the original handler failure wins
        assert!(matches!(err, RouteError::Handler { ref route, .. } if route == "explosive"));
    }

    #[test]
    fn test_after_failure_propagates_when_loop_succeeds() {
        let hits = counter();
        let mut table = RoutingTable::new();
        table.register(counting_route(HttpMethod::Get, "/a", &hits));

        let dispatcher = Dispatcher::new(
            None,
            Some(Arc::new(handler_fn(|_ctx| Err("after failed".into())))),
            false,
        );

        let err = dispatcher
            .dispatch(&table, HttpContext::new(HttpMethod::Get, "/a"))
            .unwrap_err();

        assert!(matches!(err, RouteError::Hook { hook: "after", .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handler_failure_stops_later_routes() {
        let tail = counter();
        let mut table = RoutingTable::new();
        table.register(Route::new(HttpMethod::Get, "/a", handler_fn(|_ctx| Err("boom".into()))).unwrap());
        table.register(counting_route(HttpMethod::Get, "/a", &tail));

        let err = plain_dispatcher()
            .dispatch(&table, HttpContext::new(HttpMethod::Get, "/a"))
            .unwrap_err();

        assert!(matches!(err, RouteError::Handler { .. }));
        assert_eq!(tail.load(Ordering::SeqCst), 0);
    }
}

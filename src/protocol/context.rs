//! Per-request context consumed and produced by the routing core.
//!
//! The listener layer builds an [`HttpContext`] for every inbound request
//! (URL-decoded path beginning with `/`) and hands it to
//! [`Router::route`](crate::Router::route). Handlers mutate the context in
//! place; setting the responded flag is how a handler commits a response
//! and short-circuits the dispatch loop.

use std::collections::HashMap;

use crate::protocol::HttpMethod;

/// The routing view of one HTTP request.
///
/// Captured path parameters are injected into [`Request::params`] by the
/// core immediately before each handler invocation.
#[derive(Debug, Clone)]
pub struct HttpContext {
    request: Request,
    responded: bool,
}

#[derive(Debug, Clone)]
pub struct Request {
    method: HttpMethod,
    path: String,
    id: String,
    name: String,
    params: HashMap<String, String>,
}

impl HttpContext {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            request: Request {
                method,
                path: path.into(),
                id: String::new(),
                name: String::new(),
                params: HashMap::new(),
            },
            responded: false,
        }
    }

    /// Sets the opaque request id used in log lines.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.request.id = id.into();
        self
    }

    /// Sets the opaque request label used in log lines.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.request.name = name.into();
        self
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut Request {
        &mut self.request
    }

    /// True once a handler has committed a response.
    pub fn has_responded(&self) -> bool {
        self.responded
    }

    pub fn set_responded(&mut self, responded: bool) {
        self.responded = responded;
    }
}

impl Request {
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.params
    }
}

//! HTTP method filter used on the method axis of route matching.
//!
//! Routes carry an [`HttpMethod`] rather than a bare `http::Method` because
//! the routing table needs an `All` sentinel that matches any verb. The
//! listener layer converts inbound `http::Method` values at the seam.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

/// HTTP verb filter for routes.
///
/// `All` is a wildcard on the method axis: a route registered with `All`
/// accepts requests of any verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    All,
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Connect,
    Patch,
    Trace,
}

/// Error returned when a method string or `http::Method` has no
/// [`HttpMethod`] counterpart (e.g. an extension method).
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported http method: {0}")]
pub struct UnsupportedMethod(pub String);

impl HttpMethod {
    /// Returns true iff a route with this filter accepts a request
    /// carrying `other`.
    pub fn accepts(&self, other: HttpMethod) -> bool {
        matches!(self, HttpMethod::All) || *self == other
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::All => "ALL",
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Connect => "CONNECT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = UnsupportedMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL" => Ok(HttpMethod::All),
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            "CONNECT" => Ok(HttpMethod::Connect),
            "PATCH" => Ok(HttpMethod::Patch),
            "TRACE" => Ok(HttpMethod::Trace),
            other => Err(UnsupportedMethod(other.to_string())),
        }
    }
}

impl TryFrom<&http::Method> for HttpMethod {
    type Error = UnsupportedMethod;

    fn try_from(method: &http::Method) -> Result<Self, Self::Error> {
        method.as_str().parse()
    }
}

mod context;
pub use context::HttpContext;
pub use context::Request;

mod method;
pub use method::HttpMethod;
pub use method::UnsupportedMethod;

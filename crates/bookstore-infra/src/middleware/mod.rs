//! Shared HTTP middleware for the bookstore server

pub mod no_cache;
pub mod request_id;
pub mod security_headers;

pub use no_cache::no_cache_middleware;
pub use request_id::{get_request_id, request_id_middleware, RequestId};
pub use security_headers::security_headers_middleware;

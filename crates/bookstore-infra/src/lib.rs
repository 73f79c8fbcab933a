//! Bookstore Infrastructure Library
//!
//! Shared infrastructure for the bookstore server:
//! - Middleware (request ID, security headers, no-cache)
//! - Tracing initialization

#[cfg(feature = "middleware")]
pub mod middleware;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

// Re-export commonly used types
#[cfg(feature = "middleware")]
pub use middleware::{
    get_request_id, no_cache_middleware, request_id_middleware, security_headers_middleware,
    RequestId,
};

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, LogFormat};

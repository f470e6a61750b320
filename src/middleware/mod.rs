//! Middleware components for request processing

pub mod filters;

pub use filters::{filter_middleware, rejection_response, to_filter_request};

//! TextGrab HTTP API gateway.
//!
//! Axum routes for image processing, per-client rate limiting and the
//! mapping from pipeline errors to JSON error responses.

pub mod api;
pub mod error;
pub mod rate_limit;
pub mod server;

pub use error::ApiError;
pub use rate_limit::RateLimiter;
pub use server::{GatewayState, build_router, start_server};

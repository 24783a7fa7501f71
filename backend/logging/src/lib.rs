//! Structured logging for TextGrab.
//!
//! Console output, optional rolling NDJSON files, and credential scrubbing
//! for provider error text.

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use redact::redact_sensitive_data;

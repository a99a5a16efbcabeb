//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber, with pretty or
//! JSON formatting and `RUST_LOG` overrides.

pub mod logger;

pub use logger::LoggerImpl;

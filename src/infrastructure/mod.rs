//! Infrastructure layer module
//!
//! Adapters and external integrations:
//! - Rick and Morty API client
//! - HTTP server
//! - Configuration management
//! - Logging infrastructure
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod http;
pub mod logging;
pub mod rickmorty;

//! Domain layer
//!
//! Records, query shapes, error types and the ports the services consume.

pub mod error;
pub mod models;
pub mod ports;

pub use error::{FetchError, ServiceError, ServiceResult};

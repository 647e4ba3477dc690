//! Utility modules for common functionality.
//!
//! This module provides various utility functions and types that are used across
//! the application. Currently includes:
//!
//! - constants: Constants for the application
//! - http: Retrying HTTP client construction
//! - logging: Logging utilities
//! - metrics: Metrics registry and status server
//! - tests: Builders for test fixtures

pub mod constants;
pub mod http;
pub mod logging;
pub mod metrics;
pub mod tests;

pub use constants::*;
pub use http::{create_provider_http_client, create_retryable_http_client, HttpRetryConfig};

//! Notification error types and handling.
//!
//! Provides error types for alert delivery, including network issues, sink
//! configuration problems and failed local commands.

use log::error;
use std::{error::Error, fmt};

/// Represents possible errors during notification operations
#[derive(Debug)]
pub enum NotificationError {
	/// Network-related errors (e.g., webhook failures)
	NetworkError(String),
	/// Configuration-related errors
	ConfigError(String),
	/// A notification command failed, timed out or could not be started
	ExecutionError(String),
	/// Internal errors (e.g., failed to serialize a payload)
	InternalError(String),
}

impl NotificationError {
	/// Formats the error message based on the error type
	fn format_message(&self) -> String {
		match self {
			Self::NetworkError(msg) => format!("Network error: {}", msg),
			Self::ConfigError(msg) => format!("Config error: {}", msg),
			Self::ExecutionError(msg) => format!("Execution error: {}", msg),
			Self::InternalError(msg) => format!("Internal error: {}", msg),
		}
	}

	/// Creates a new network error with logging
	pub fn network_error(msg: impl Into<String>) -> Self {
		let error = Self::NetworkError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new configuration error with logging
	pub fn config_error(msg: impl Into<String>) -> Self {
		let error = Self::ConfigError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new execution error with logging
	pub fn execution_error(msg: impl Into<String>) -> Self {
		let error = Self::ExecutionError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new internal error with logging
	pub fn internal_error(msg: impl Into<String>) -> Self {
		let error = Self::InternalError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl From<reqwest_middleware::Error> for NotificationError {
	fn from(error: reqwest_middleware::Error) -> Self {
		Self::network_error(error.to_string())
	}
}

impl From<serde_json::Error> for NotificationError {
	fn from(error: serde_json::Error) -> Self {
		Self::internal_error(error.to_string())
	}
}

impl fmt::Display for NotificationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for NotificationError {}

//! Error types for repository operations.
//!
//! This module defines the errors raised while reading and writing the persistent
//! key-value store and while decoding the values kept in it.

use log::error;
use std::error::Error;
use std::fmt;

/// Errors that can occur during repository operations
#[derive(Debug)]
pub enum RepositoryError {
	/// A value was written that fails validation
	ValidationError(String),

	/// The backing file could not be read
	LoadError(String),

	/// The backing file could not be written
	WriteError(String),

	/// A stored value does not have the expected shape
	ParseError(String),
}

impl RepositoryError {
	/// Format an error message for display
	fn format_message(&self) -> String {
		match self {
			Self::ValidationError(msg) => format!("Validation error: {}", msg),
			Self::LoadError(msg) => format!("Load error: {}", msg),
			Self::WriteError(msg) => format!("Write error: {}", msg),
			Self::ParseError(msg) => format!("Parse error: {}", msg),
		}
	}

	/// Create a new validation error with the given message
	///
	/// Also logs the error message at the error level.
	pub fn validation_error(msg: impl Into<String>) -> Self {
		let error = Self::ValidationError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Create a new load error with the given message
	///
	/// Also logs the error message at the error level.
	pub fn load_error(msg: impl Into<String>) -> Self {
		let error = Self::LoadError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Create a new write error with the given message
	///
	/// Also logs the error message at the error level.
	pub fn write_error(msg: impl Into<String>) -> Self {
		let error = Self::WriteError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Create a new parse error with the given message
	///
	/// Also logs the error message at the error level.
	pub fn parse_error(msg: impl Into<String>) -> Self {
		let error = Self::ParseError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl fmt::Display for RepositoryError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for RepositoryError {}

impl From<serde_json::Error> for RepositoryError {
	fn from(err: serde_json::Error) -> Self {
		Self::parse_error(err.to_string())
	}
}

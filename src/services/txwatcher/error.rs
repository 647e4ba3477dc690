//! Transaction watcher error types and handling.

use log::error;
use std::{error::Error, fmt};

use crate::repositories::RepositoryError;

/// Errors that stop a poll cycle or the scheduler
///
/// Fetch failures are not among them; they are handled inside the cycle.
#[derive(Debug)]
pub enum TxWatcherError {
	/// The scheduler could not be created, started or stopped
	SchedulerError(String),
	/// The state store could not be read or written
	StorageError(String),
	/// Invalid watcher configuration
	ConfigError(String),
}

impl TxWatcherError {
	fn format_message(&self) -> String {
		match self {
			Self::SchedulerError(msg) => format!("Scheduler error: {}", msg),
			Self::StorageError(msg) => format!("Storage error: {}", msg),
			Self::ConfigError(msg) => format!("Config error: {}", msg),
		}
	}

	pub fn scheduler_error(msg: impl Into<String>) -> Self {
		let error = Self::SchedulerError(msg.into());
		error!("{}", error.format_message());
		error
	}

	pub fn storage_error(msg: impl Into<String>) -> Self {
		let error = Self::StorageError(msg.into());
		error!("{}", error.format_message());
		error
	}

	pub fn config_error(msg: impl Into<String>) -> Self {
		let error = Self::ConfigError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl From<RepositoryError> for TxWatcherError {
	fn from(err: RepositoryError) -> Self {
		Self::storage_error(err.to_string())
	}
}

impl fmt::Display for TxWatcherError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for TxWatcherError {}

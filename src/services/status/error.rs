use log::error;
use std::{error::Error, fmt};

use crate::repositories::RepositoryError;

#[derive(Debug)]
pub enum StatusError {
	/// The state store could not be read
	StorageError(String),
}

impl StatusError {
	fn format_message(&self) -> String {
		match self {
			Self::StorageError(msg) => format!("Storage error: {}", msg),
		}
	}

	pub fn storage_error(msg: impl Into<String>) -> Self {
		let error = Self::StorageError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl From<RepositoryError> for StatusError {
	fn from(err: RepositoryError) -> Self {
		Self::storage_error(err.to_string())
	}
}

impl fmt::Display for StatusError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for StatusError {}

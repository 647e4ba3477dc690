//! Errors raised while loading the application configuration file.

use log::error;
use std::{error::Error, fmt, path::PathBuf};

/// Why the configuration could not be used
#[derive(Debug)]
pub enum ConfigError {
	/// An explicitly requested file does not exist
	NotFound(PathBuf),

	/// The file exists but could not be read
	Unreadable { path: PathBuf, reason: String },

	/// The file is not a JSON document in the configuration layout
	Malformed { path: PathBuf, reason: String },

	/// A setting holds a value the notifier cannot run with
	InvalidSetting {
		setting: &'static str,
		value: String,
		reason: &'static str,
	},
}

impl ConfigError {
	fn format_message(&self) -> String {
		match self {
			Self::NotFound(path) => format!("Configuration file not found: {}", path.display()),
			Self::Unreadable { path, reason } => {
				format!("Cannot read {}: {}", path.display(), reason)
			}
			Self::Malformed { path, reason } => {
				format!("Malformed configuration in {}: {}", path.display(), reason)
			}
			Self::InvalidSetting {
				setting,
				value,
				reason,
			} => format!("Invalid {} `{}`: {}", setting, value, reason),
		}
	}

	/// Name of the offending setting, for validation failures
	pub fn setting(&self) -> Option<&'static str> {
		match self {
			Self::InvalidSetting { setting, .. } => Some(setting),
			_ => None,
		}
	}

	pub fn not_found(path: impl Into<PathBuf>) -> Self {
		let error = Self::NotFound(path.into());
		error!("{}", error.format_message());
		error
	}

	pub fn unreadable(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
		let error = Self::Unreadable {
			path: path.into(),
			reason: err.to_string(),
		};
		error!("{}", error.format_message());
		error
	}

	pub fn malformed(path: impl Into<PathBuf>, err: serde_json::Error) -> Self {
		let error = Self::Malformed {
			path: path.into(),
			reason: err.to_string(),
		};
		error!("{}", error.format_message());
		error
	}

	/// Create a validation failure for one setting and log it
	pub fn invalid_setting(
		setting: &'static str,
		value: impl fmt::Display,
		reason: &'static str,
	) -> Self {
		let error = Self::InvalidSetting {
			setting,
			value: value.to_string(),
			reason,
		};
		error!("{}", error.format_message());
		error
	}
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for ConfigError {}

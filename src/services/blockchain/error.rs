//! Errors raised while fetching transactions from a chain provider.

use thiserror::Error;

/// Failure of a single adapter fetch
///
/// The variants separate transport problems from provider responses, so the rate
/// controller can classify them without parsing transport details.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
	/// Transport failure or timeout
	#[error("Network error: {0}")]
	Network(String),

	/// The provider answered with a non-success HTTP status
	#[error("Provider rejected request with HTTP {status}: {message}")]
	ProviderRejected { status: u16, message: String },

	/// The provider payload signals a logical failure
	#[error("{0}")]
	Application(String),
}

impl FetchError {
	/// HTTP status carried by the error, if any
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::ProviderRejected { status, .. } => Some(*status),
			_ => None,
		}
	}

	/// Short kind label used in logs and metrics
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Network(_) => "network",
			Self::ProviderRejected { .. } => "provider_rejected",
			Self::Application(_) => "application",
		}
	}
}

impl From<reqwest_middleware::Error> for FetchError {
	fn from(err: reqwest_middleware::Error) -> Self {
		Self::Network(err.to_string())
	}
}

//! Chain adapter interface.
//!
//! An adapter fetches the most recent transactions of one address and normalizes them
//! into [`TransactionRecord`]s, newest first.

use async_trait::async_trait;

use crate::{
	models::{ChainKind, TransactionRecord},
	services::blockchain::FetchError,
};

#[async_trait]
pub trait ChainAdapter: Send + Sync {
	/// The chain this adapter talks to
	fn chain(&self) -> ChainKind;

	/// Fetches the latest transactions of `address`, newest first
	///
	/// # Arguments
	/// * `address` - The monitored address
	/// * `credential` - Provider API key, required by some chains
	///
	/// # Returns
	/// * `Result<Vec<TransactionRecord>, FetchError>` - Normalized records; only the first
	///   one is inspected by the poll cycle
	async fn fetch_latest(
		&self,
		address: &str,
		credential: Option<&str>,
	) -> Result<Vec<TransactionRecord>, FetchError>;
}

/// Reads the body of a non-success response into a [`FetchError::ProviderRejected`]
pub(crate) async fn rejection(response: reqwest::Response) -> FetchError {
	let status = response.status();
	let body = response.text().await.unwrap_or_default();
	let message = match body.trim() {
		"" => status
			.canonical_reason()
			.unwrap_or("Unknown status")
			.to_string(),
		text => text.chars().take(200).collect(),
	};
	FetchError::ProviderRejected {
		status: status.as_u16(),
		message,
	}
}

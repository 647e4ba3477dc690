//! Adapter for Etherscan-compatible account transaction lists.

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::{
	models::{ChainKind, Direction, EtherscanResponse, EtherscanTransaction, TransactionRecord},
	services::blockchain::{client::rejection, ChainAdapter, FetchError},
};

const WEI_SCALE: u32 = 18;
const ETH_DISPLAY_DECIMALS: u32 = 6;

/// Number of transactions requested per poll
const PAGE_SIZE: &str = "10";

/// Fetches the account transaction list of an Ethereum address
#[derive(Clone)]
pub struct EthereumAdapter {
	client: ClientWithMiddleware,
	base_url: String,
}

impl EthereumAdapter {
	/// Creates an adapter for the API rooted at `base_url`, e.g. `https://api.etherscan.io`
	pub fn new(client: ClientWithMiddleware, base_url: impl Into<String>) -> Self {
		Self {
			client,
			base_url: base_url.into().trim_end_matches('/').to_string(),
		}
	}

	fn endpoint(&self) -> String {
		format!("{}/api", self.base_url)
	}
}

#[async_trait]
impl ChainAdapter for EthereumAdapter {
	fn chain(&self) -> ChainKind {
		ChainKind::Ethereum
	}

	async fn fetch_latest(
		&self,
		address: &str,
		credential: Option<&str>,
	) -> Result<Vec<TransactionRecord>, FetchError> {
		let api_key = credential
			.filter(|key| !key.is_empty())
			.ok_or_else(|| FetchError::Application("API key is required".to_string()))?;

		let response = self
			.client
			.get(self.endpoint())
			.query(&[
				("module", "account"),
				("action", "txlist"),
				("address", address),
				("startblock", "0"),
				("endblock", "99999999"),
				("page", "1"),
				("offset", PAGE_SIZE),
				("sort", "desc"),
				("apikey", api_key),
			])
			.send()
			.await?;

		if !response.status().is_success() {
			return Err(rejection(response).await);
		}

		let body: EtherscanResponse = response
			.json()
			.await
			.map_err(|e| FetchError::Application(format!("Invalid response body: {}", e)))?;

		if !body.is_ok() {
			if body.is_empty_history() {
				debug!(address = %address, "no ethereum transactions yet");
				return Ok(Vec::new());
			}
			return Err(FetchError::Application(body.error_message()));
		}

		let transactions: Vec<EtherscanTransaction> = serde_json::from_value(body.result)
			.map_err(|e| FetchError::Application(format!("Invalid transaction list: {}", e)))?;

		Ok(transactions
			.into_iter()
			.map(|tx| normalize(tx, address))
			.collect())
	}
}

/// Converts a wei amount into the `0.000000 ETH` display form
pub fn format_wei(value: Option<&str>) -> String {
	value
		.and_then(|v| v.trim().parse::<i128>().ok())
		.and_then(|wei| Decimal::try_from_i128_with_scale(wei, WEI_SCALE).ok())
		.map(|eth| {
			let rounded = eth.round_dp_with_strategy(
				ETH_DISPLAY_DECIMALS,
				RoundingStrategy::MidpointAwayFromZero,
			);
			format!("{:.6} ETH", rounded)
		})
		.unwrap_or_else(|| "N/A".to_string())
}

fn normalize(tx: EtherscanTransaction, address: &str) -> TransactionRecord {
	let direction = match tx.from.as_deref() {
		Some(from) if from.eq_ignore_ascii_case(address) => Direction::Outgoing,
		_ => Direction::Incoming,
	};
	let timestamp = tx
		.time_stamp
		.as_deref()
		.and_then(|ts| ts.trim().parse::<i64>().ok())
		.and_then(|secs| secs.checked_mul(1000))
		.unwrap_or_else(|| chrono::Utc::now().timestamp_millis());

	TransactionRecord {
		amount: format_wei(tx.value.as_deref()),
		hash: tx.hash,
		direction,
		timestamp,
		is_new: false,
		from: tx.from,
		to: tx.to,
		gas_price: tx.gas_price,
		gas_used: tx.gas_used,
		block_height: None,
		fee: None,
	}
}

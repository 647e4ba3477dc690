//! Adapter for Esplora-compatible address histories.

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use rust_decimal::{prelude::ToPrimitive, Decimal};

use crate::{
	models::{ChainKind, Direction, EsploraTransaction, TransactionRecord},
	services::blockchain::{client::rejection, ChainAdapter, FetchError},
};


/// Fetches the transaction history of a Bitcoin address
#[derive(Clone)]
pub struct BitcoinAdapter {
	client: ClientWithMiddleware,
	base_url: String,
}

impl BitcoinAdapter {
	/// Creates an adapter for the API rooted at `base_url`, e.g. `https://blockstream.info/api`
	pub fn new(client: ClientWithMiddleware, base_url: impl Into<String>) -> Self {
		Self {
			client,
			base_url: base_url.into().trim_end_matches('/').to_string(),
		}
	}

	fn endpoint(&self, address: &str) -> String {
		format!(
			"{}/address/{}/txs",
			self.base_url,
			urlencoding::encode(address)
		)
	}
}

#[async_trait]
impl ChainAdapter for BitcoinAdapter {
	fn chain(&self) -> ChainKind {
		ChainKind::Bitcoin
	}

	async fn fetch_latest(
		&self,
		address: &str,
		_credential: Option<&str>,
	) -> Result<Vec<TransactionRecord>, FetchError> {
		let response = self.client.get(self.endpoint(address)).send().await?;

		if !response.status().is_success() {
			return Err(rejection(response).await);
		}

		let transactions: Vec<EsploraTransaction> = response
			.json()
			.await
			.map_err(|e| FetchError::Application(format!("Invalid response body: {}", e)))?;

		Ok(transactions
			.into_iter()
			.map(|tx| normalize(tx, address))
			.collect())
	}
}

fn sats_to_btc(sats: u64) -> Decimal {
	Decimal::from_i128_with_scale(sats as i128, 8)
}

/// Converts a satoshi amount into the `0.00000000 BTC` display form
pub fn format_sats(sats: u64) -> String {
	format!("{:.8} BTC", sats_to_btc(sats))
}

/// A transaction paying the address counts as incoming; anything else as outgoing.
/// Inputs are not inspected, so a payment to self with change reads as incoming.
fn normalize(tx: EsploraTransaction, address: &str) -> TransactionRecord {
	let received: u64 = tx
		.vout
		.iter()
		.filter(|output| output.scriptpubkey_address.as_deref() == Some(address))
		.map(|output| output.value)
		.sum();

	let direction = if received > 0 {
		Direction::Incoming
	} else {
		Direction::Outgoing
	};

	let timestamp = tx
		.status
		.block_time
		.and_then(|secs| secs.checked_mul(1000))
		.unwrap_or_else(|| chrono::Utc::now().timestamp_millis());

	TransactionRecord {
		hash: tx.txid,
		amount: format_sats(received),
		direction,
		timestamp,
		is_new: false,
		from: None,
		to: None,
		gas_price: None,
		gas_used: None,
		block_height: tx.status.block_height,
		fee: tx.fee.and_then(|sats| sats_to_btc(sats).to_f64()),
	}
}

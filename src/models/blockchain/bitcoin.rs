//! Wire types for the Esplora-compatible address history endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EsploraTransaction {
	pub txid: String,
	#[serde(default)]
	pub vout: Vec<EsploraOutput>,
	#[serde(default)]
	pub status: EsploraStatus,
	/// Fee in satoshis
	#[serde(default)]
	pub fee: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EsploraOutput {
	#[serde(default)]
	pub scriptpubkey_address: Option<String>,
	/// Output value in satoshis
	pub value: u64,
}

/// Confirmation status; unconfirmed transactions carry neither height nor time
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EsploraStatus {
	#[serde(default)]
	pub confirmed: bool,
	#[serde(default)]
	pub block_height: Option<u64>,
	#[serde(default)]
	pub block_time: Option<i64>,
}

//! Wire types for the Etherscan-compatible account transaction list endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope returned by `module=account&action=txlist`
///
/// `result` is an array of transactions on success and a plain string describing the
/// failure otherwise (e.g. `"Max rate limit reached"`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EtherscanResponse {
	pub status: String,
	#[serde(default)]
	pub message: String,
	#[serde(default)]
	pub result: Value,
}

impl EtherscanResponse {
	pub fn is_ok(&self) -> bool {
		self.status == "1"
	}

	/// Etherscan reports an address without history as a failed status
	pub fn is_empty_history(&self) -> bool {
		self.message.eq_ignore_ascii_case("No transactions found")
	}

	/// Message describing a failed response, including the textual result if present
	pub fn error_message(&self) -> String {
		match self.result.as_str() {
			Some(detail) if !detail.is_empty() => format!("{}: {}", self.message, detail),
			_ => self.message.clone(),
		}
	}
}

/// A single transaction from the account transaction list
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EtherscanTransaction {
	pub hash: String,
	#[serde(default)]
	pub value: Option<String>,
	#[serde(default)]
	pub from: Option<String>,
	#[serde(default)]
	pub to: Option<String>,
	#[serde(default)]
	pub time_stamp: Option<String>,
	#[serde(default)]
	pub gas_price: Option<String>,
	#[serde(default)]
	pub gas_used: Option<String>,
}

use serde::{Deserialize, Deserializer, Serialize};

/// Direction of a transaction relative to the monitored address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
	Incoming,
	Outgoing,
}

impl Direction {
	/// Human readable label used in alert bodies
	pub fn label(&self) -> &'static str {
		match self {
			Self::Incoming => "Incoming",
			Self::Outgoing => "Outgoing",
		}
	}
}

/// Chain-agnostic transaction record, in the shape it is persisted
///
/// Field names follow the persisted store layout, so histories written by earlier
/// versions of the notifier stay readable.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
	/// Unique identifier of the transaction within its chain
	pub hash: String,
	/// Formatted amount including the unit suffix, e.g. `0.500000 ETH`
	pub amount: String,
	#[serde(rename = "type")]
	pub direction: Direction,
	/// Epoch milliseconds
	#[serde(default, deserialize_with = "deserialize_timestamp")]
	pub timestamp: i64,
	/// Set on detection and cleared shortly after delivery
	#[serde(default)]
	pub is_new: bool,

	// Account-based chain details
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub from: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub to: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub gas_price: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub gas_used: Option<String>,

	// UTXO chain details
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub block_height: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fee: Option<f64>,
}

/// Accepts integer or float milliseconds; `null` and non-finite values read as 0
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Option::<f64>::deserialize(deserializer)?;
	Ok(value.filter(|v| v.is_finite()).map_or(0, |v| v as i64))
}

impl TransactionRecord {
	/// Shortened hash for alert bodies: first 10 and last 8 characters
	pub fn short_hash(&self) -> String {
		let chars: Vec<char> = self.hash.chars().collect();
		if chars.len() <= 18 {
			return self.hash.clone();
		}
		let head: String = chars[..10].iter().collect();
		let tail: String = chars[chars.len() - 8..].iter().collect();
		format!("{}...{}", head, tail)
	}
}

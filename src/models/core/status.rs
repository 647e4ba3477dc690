use serde::{Deserialize, Serialize};

/// Point-in-time view of configuration and controller state
///
/// Serialized with the field names operator panels already consume.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStatus {
	pub has_eth_address: bool,
	pub has_btc_address: bool,
	pub has_api_key: bool,
	pub eth_enabled: bool,
	pub btc_enabled: bool,
	pub is_configured: bool,
	#[serde(rename = "isRateLimited")]
	pub is_cooling_down: bool,
	#[serde(rename = "rateLimitUntil")]
	pub cool_down_until_ms: i64,
	#[serde(rename = "consecutiveErrors")]
	pub consecutive_error_count: u32,
	#[serde(rename = "lastCheckTime")]
	pub last_poll_timestamp: Option<i64>,
}

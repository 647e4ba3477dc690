//! Test helper utilities for monitor configuration
//!
//! - `MonitorConfigBuilder`: Builder for creating test MonitorConfig instances

use crate::models::{ChainConfig, MonitorConfig};

pub const TEST_ETH_ADDRESS: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";
pub const TEST_BTC_ADDRESS: &str = "bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh";
pub const TEST_API_KEY: &str = "ABCDEFGHIJ0123456789";

/// Builder for creating test MonitorConfig instances
#[derive(Default)]
pub struct MonitorConfigBuilder {
	config: MonitorConfig,
}

impl MonitorConfigBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Enables Ethereum with the test address and API key
	pub fn ethereum(mut self) -> Self {
		self.config.ethereum = ChainConfig {
			address: Some(TEST_ETH_ADDRESS.to_string()),
			enabled: true,
			credential: Some(TEST_API_KEY.to_string()),
		};
		self
	}

	/// Enables Bitcoin with the test address
	pub fn bitcoin(mut self) -> Self {
		self.config.bitcoin = ChainConfig {
			address: Some(TEST_BTC_ADDRESS.to_string()),
			enabled: true,
			credential: None,
		};
		self
	}

	pub fn eth_address(mut self, address: &str) -> Self {
		self.config.ethereum.address = Some(address.to_string());
		self
	}

	pub fn api_key(mut self, api_key: Option<&str>) -> Self {
		self.config.ethereum.credential = api_key.map(str::to_string);
		self
	}

	pub fn build(self) -> MonitorConfig {
		self.config
	}
}

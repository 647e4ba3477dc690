use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::ChainKind;

lazy_static! {
	static ref ETH_ADDRESS_REGEX: Regex = Regex::new(r"^0x[a-fA-F0-9]{40}$").unwrap();
	static ref BTC_ADDRESS_REGEX: Regex = Regex::new(r"^(bc1|[13])[a-zA-Z0-9]{25,62}$").unwrap();
	static ref API_KEY_REGEX: Regex = Regex::new(r"^[a-zA-Z0-9]{10,}$").unwrap();
}

/// Monitoring settings for a single chain
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ChainConfig {
	pub address: Option<String>,
	pub enabled: bool,
	/// Provider credential, only meaningful for chains that require one
	pub credential: Option<String>,
}

impl ChainConfig {
	pub fn has_address(&self) -> bool {
		self.address.as_deref().is_some_and(|a| !a.trim().is_empty())
	}

	pub fn has_credential(&self) -> bool {
		self.credential.as_deref().is_some_and(|c| !c.trim().is_empty())
	}
}

/// Operator supplied monitoring configuration, read at the start of every cycle
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MonitorConfig {
	pub ethereum: ChainConfig,
	pub bitcoin: ChainConfig,
}

impl MonitorConfig {
	pub fn chain(&self, chain: ChainKind) -> &ChainConfig {
		match chain {
			ChainKind::Ethereum => &self.ethereum,
			ChainKind::Bitcoin => &self.bitcoin,
		}
	}

	pub fn any_enabled(&self) -> bool {
		self.ethereum.enabled || self.bitcoin.enabled
	}

	/// A chain is pollable when it is enabled and every field its adapter needs is set
	pub fn is_pollable(&self, chain: ChainKind) -> bool {
		let config = self.chain(chain);
		config.enabled
			&& config.has_address()
			&& (!chain.requires_credential() || config.has_credential())
	}

	/// Chains that will be polled this cycle, in polling order
	pub fn pollable_chains(&self) -> Vec<ChainKind> {
		ChainKind::ALL
			.into_iter()
			.filter(|chain| self.is_pollable(*chain))
			.collect()
	}

	/// Validates the configuration before it is saved
	///
	/// At least one chain must be enabled, and every enabled chain needs a well-formed
	/// address (and API key, for Ethereum).
	pub fn validate(&self) -> Result<(), String> {
		if !self.any_enabled() {
			return Err("At least one chain must be enabled".to_string());
		}

		if self.ethereum.enabled {
			let address = self.ethereum.address.as_deref().unwrap_or_default();
			if address.is_empty() {
				return Err("Ethereum address is required".to_string());
			}
			if !is_valid_eth_address(address) {
				return Err(format!("Invalid Ethereum address: {}", address));
			}
			let api_key = self.ethereum.credential.as_deref().unwrap_or_default();
			if api_key.is_empty() {
				return Err("API key is required for Ethereum monitoring".to_string());
			}
			if !is_valid_api_key(api_key) {
				return Err(
					"API key must be at least 10 alphanumeric characters".to_string(),
				);
			}
		}

		if self.bitcoin.enabled {
			let address = self.bitcoin.address.as_deref().unwrap_or_default();
			if address.is_empty() {
				return Err("Bitcoin address is required".to_string());
			}
			if !is_valid_btc_address(address) {
				return Err(format!("Invalid Bitcoin address: {}", address));
			}
		}

		Ok(())
	}
}

pub fn is_valid_eth_address(address: &str) -> bool {
	ETH_ADDRESS_REGEX.is_match(address)
}

pub fn is_valid_btc_address(address: &str) -> bool {
	BTC_ADDRESS_REGEX.is_match(address)
}

pub fn is_valid_api_key(api_key: &str) -> bool {
	API_KEY_REGEX.is_match(api_key)
}

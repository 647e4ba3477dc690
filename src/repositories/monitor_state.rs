//! Typed access to the monitoring state kept in the key-value store.
//!
//! Field names are part of the persisted layout and must not change.

use serde_json::{json, Value};
use std::{collections::HashMap, sync::Arc};

use crate::{
	models::{ChainConfig, ChainKind, MonitorConfig, TransactionRecord},
	repositories::{error::RepositoryError, store::KeyValueStore},
};

/// Persisted field names
pub mod fields {
	pub const ETH_ADDRESS: &str = "ethAddress";
	pub const BTC_ADDRESS: &str = "btcAddress";
	pub const API_KEY: &str = "apiKey";
	pub const ETH_ENABLED: &str = "ethEnabled";
	pub const BTC_ENABLED: &str = "btcEnabled";
	pub const ETH_TRANSACTIONS: &str = "ethTransactions";
	pub const BTC_TRANSACTIONS: &str = "btcTransactions";
	pub const LAST_CHECK_TIME: &str = "lastCheckTime";
	pub const SELECTED_LANGUAGE: &str = "selectedLanguage";
}

const CONFIG_FIELDS: [&str; 5] = [
	fields::ETH_ADDRESS,
	fields::BTC_ADDRESS,
	fields::API_KEY,
	fields::ETH_ENABLED,
	fields::BTC_ENABLED,
];

pub fn history_field(chain: ChainKind) -> &'static str {
	match chain {
		ChainKind::Ethereum => fields::ETH_TRANSACTIONS,
		ChainKind::Bitcoin => fields::BTC_TRANSACTIONS,
	}
}

/// What a poll cycle reads at its start
///
/// Histories are loaded per chain so that a damaged history only affects its own chain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateSnapshot {
	pub config: MonitorConfig,
	pub last_check_time: Option<i64>,
}

/// Repository over the monitoring fields of a key-value store
pub struct MonitorStateRepository<S: KeyValueStore> {
	store: Arc<S>,
}

impl<S: KeyValueStore> Clone for MonitorStateRepository<S> {
	fn clone(&self) -> Self {
		Self {
			store: self.store.clone(),
		}
	}
}

impl<S: KeyValueStore> MonitorStateRepository<S> {
	pub fn new(store: Arc<S>) -> Self {
		Self { store }
	}

	pub fn store(&self) -> &Arc<S> {
		&self.store
	}

	/// Loads configuration and the last poll timestamp in one read
	pub async fn load_snapshot(&self) -> Result<StateSnapshot, RepositoryError> {
		let mut requested: Vec<&str> = CONFIG_FIELDS.to_vec();
		requested.push(fields::LAST_CHECK_TIME);
		let values = self.store.get(&requested).await?;

		Ok(StateSnapshot {
			config: config_from_values(&values),
			last_check_time: values.get(fields::LAST_CHECK_TIME).and_then(Value::as_i64),
		})
	}

	pub async fn load_config(&self) -> Result<MonitorConfig, RepositoryError> {
		let values = self.store.get(&CONFIG_FIELDS).await?;
		Ok(config_from_values(&values))
	}

	pub async fn load_history(
		&self,
		chain: ChainKind,
	) -> Result<Vec<TransactionRecord>, RepositoryError> {
		let field = history_field(chain);
		let values = self.store.get(&[field]).await?;
		history_from_values(&values, field)
	}

	pub async fn save_history(
		&self,
		chain: ChainKind,
		history: &[TransactionRecord],
	) -> Result<(), RepositoryError> {
		let value = serde_json::to_value(history)?;
		self.store
			.set(HashMap::from([(history_field(chain).to_string(), value)]))
			.await
	}

	pub async fn last_check_time(&self) -> Result<Option<i64>, RepositoryError> {
		let values = self.store.get(&[fields::LAST_CHECK_TIME]).await?;
		Ok(values.get(fields::LAST_CHECK_TIME).and_then(Value::as_i64))
	}

	pub async fn set_last_check_time(&self, timestamp_ms: i64) -> Result<(), RepositoryError> {
		self.store
			.set(HashMap::from([(
				fields::LAST_CHECK_TIME.to_string(),
				json!(timestamp_ms),
			)]))
			.await
	}

	/// Validates and saves a configuration
	///
	/// The last poll timestamp is reset so the next scheduler tick polls right away.
	pub async fn save_config(&self, config: &MonitorConfig) -> Result<(), RepositoryError> {
		config.validate().map_err(RepositoryError::validation_error)?;

		let optional = |value: &Option<String>| match value.as_deref().map(str::trim) {
			Some(v) if !v.is_empty() => json!(v),
			_ => json!(""),
		};

		self.store
			.set(HashMap::from([
				(
					fields::ETH_ADDRESS.to_string(),
					optional(&config.ethereum.address),
				),
				(
					fields::BTC_ADDRESS.to_string(),
					optional(&config.bitcoin.address),
				),
				(
					fields::API_KEY.to_string(),
					optional(&config.ethereum.credential),
				),
				(
					fields::ETH_ENABLED.to_string(),
					json!(config.ethereum.enabled),
				),
				(
					fields::BTC_ENABLED.to_string(),
					json!(config.bitcoin.enabled),
				),
				(fields::LAST_CHECK_TIME.to_string(), Value::Null),
			]))
			.await
	}

	/// Clears addresses and credential, disables both chains and empties both histories
	pub async fn clear_config(&self) -> Result<(), RepositoryError> {
		self.store
			.set(HashMap::from([
				(fields::ETH_ADDRESS.to_string(), json!("")),
				(fields::BTC_ADDRESS.to_string(), json!("")),
				(fields::API_KEY.to_string(), json!("")),
				(fields::ETH_ENABLED.to_string(), json!(false)),
				(fields::BTC_ENABLED.to_string(), json!(false)),
				(fields::ETH_TRANSACTIONS.to_string(), json!([])),
				(fields::BTC_TRANSACTIONS.to_string(), json!([])),
			]))
			.await
	}

	/// Drops the `isNew` highlight from every record of a chain
	pub async fn clear_new_flags(&self, chain: ChainKind) -> Result<(), RepositoryError> {
		let mut history = self.load_history(chain).await?;
		if !history.iter().any(|tx| tx.is_new) {
			return Ok(());
		}
		for tx in history.iter_mut() {
			tx.is_new = false;
		}
		self.save_history(chain, &history).await
	}

	pub async fn selected_language(&self) -> Result<Option<String>, RepositoryError> {
		let values = self.store.get(&[fields::SELECTED_LANGUAGE]).await?;
		Ok(values
			.get(fields::SELECTED_LANGUAGE)
			.and_then(Value::as_str)
			.filter(|lang| !lang.is_empty())
			.map(str::to_string))
	}
}

fn string_field(values: &HashMap<String, Value>, field: &str) -> Option<String> {
	values
		.get(field)
		.and_then(Value::as_str)
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.map(str::to_string)
}

fn bool_field(values: &HashMap<String, Value>, field: &str) -> bool {
	values
		.get(field)
		.and_then(Value::as_bool)
		.unwrap_or(false)
}

fn config_from_values(values: &HashMap<String, Value>) -> MonitorConfig {
	MonitorConfig {
		ethereum: ChainConfig {
			address: string_field(values, fields::ETH_ADDRESS),
			enabled: bool_field(values, fields::ETH_ENABLED),
			credential: string_field(values, fields::API_KEY),
		},
		bitcoin: ChainConfig {
			address: string_field(values, fields::BTC_ADDRESS),
			enabled: bool_field(values, fields::BTC_ENABLED),
			credential: None,
		},
	}
}

fn history_from_values(
	values: &HashMap<String, Value>,
	field: &str,
) -> Result<Vec<TransactionRecord>, RepositoryError> {
	match values.get(field) {
		None | Some(Value::Null) => Ok(Vec::new()),
		Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
			RepositoryError::parse_error(format!("Invalid {} value: {}", field, e))
		}),
	}
}

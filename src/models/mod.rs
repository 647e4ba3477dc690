//! Domain models and data structures for transaction monitoring.
//!
//! - `blockchain`: Provider response shapes for Ethereum and Bitcoin explorers
//! - `config`: Application configuration loading and validation
//! - `core`: Core domain models (chains, monitor configuration, transactions, status)

mod blockchain;
mod config;
mod core;

pub use blockchain::bitcoin::{EsploraOutput, EsploraStatus, EsploraTransaction};
pub use blockchain::ethereum::{EtherscanResponse, EtherscanTransaction};

pub use core::{
	is_valid_api_key, is_valid_btc_address, is_valid_eth_address, ChainConfig, ChainKind,
	Direction, MonitorConfig, MonitorStatus, TransactionRecord,
};

pub use config::{
	AppConfig, CommandSinkConfig, ConfigError, NotificationsConfig, PollingConfig,
	ProviderConfig, StatusServerConfig, StorageConfig, WebhookSinkConfig,
};

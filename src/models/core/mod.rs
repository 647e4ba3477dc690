mod chain;
mod monitor_config;
mod status;
mod transaction;

pub use chain::ChainKind;
pub use monitor_config::{
	is_valid_api_key, is_valid_btc_address, is_valid_eth_address, ChainConfig, MonitorConfig,
};
pub use status::MonitorStatus;
pub use transaction::{Direction, TransactionRecord};

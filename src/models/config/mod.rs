//! Application configuration loading and validation.

mod app_config;
mod error;

pub use app_config::{
	AppConfig, CommandSinkConfig, NotificationsConfig, PollingConfig, ProviderConfig,
	StatusServerConfig, StorageConfig, WebhookSinkConfig,
};
pub use error::ConfigError;

use serde::{Deserialize, Serialize};
use std::{
	path::{Path, PathBuf},
	str::FromStr,
	time::Duration,
};

use super::error::ConfigError;
use crate::utils::constants::{
	DEFAULT_CONFIG_PATH, DEFAULT_CRON_SCHEDULE, DEFAULT_ESPLORA_API_URL,
	DEFAULT_ESPLORA_EXPLORER_URL, DEFAULT_ETHERSCAN_API_URL, DEFAULT_ETHERSCAN_EXPLORER_URL,
	DEFAULT_HISTORY_LIMIT, DEFAULT_MAX_CONSECUTIVE_ERRORS, DEFAULT_MIN_POLL_INTERVAL_MS,
	DEFAULT_NEW_FLAG_TTL_MS, DEFAULT_RATE_LIMIT_DELAY_MS, DEFAULT_REQUEST_TIMEOUT_MS,
	DEFAULT_STATUS_SERVER_ADDRESS,
};

/// Top level application configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
	pub storage: StorageConfig,
	pub providers: ProviderConfig,
	pub polling: PollingConfig,
	pub notifications: NotificationsConfig,
	pub status_server: StatusServerConfig,
}

/// Where the persistent key-value store lives
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
	pub path: PathBuf,
	pub namespace: String,
}

impl Default for StorageConfig {
	fn default() -> Self {
		Self {
			path: PathBuf::from("data"),
			namespace: "local".to_string(),
		}
	}
}

/// Upstream explorer APIs and HTTP behaviour
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
	pub etherscan_api_url: String,
	pub esplora_api_url: String,
	pub etherscan_explorer_url: String,
	pub esplora_explorer_url: String,
	pub request_timeout_ms: u64,
	/// Retries for transient transport failures within a single fetch
	pub max_retries: u32,
}

impl Default for ProviderConfig {
	fn default() -> Self {
		Self {
			etherscan_api_url: DEFAULT_ETHERSCAN_API_URL.to_string(),
			esplora_api_url: DEFAULT_ESPLORA_API_URL.to_string(),
			etherscan_explorer_url: DEFAULT_ETHERSCAN_EXPLORER_URL.to_string(),
			esplora_explorer_url: DEFAULT_ESPLORA_EXPLORER_URL.to_string(),
			request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
			max_retries: 1,
		}
	}
}

impl ProviderConfig {
	pub fn request_timeout(&self) -> Duration {
		Duration::from_millis(self.request_timeout_ms)
	}
}

/// Poll scheduling and backoff settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PollingConfig {
	pub cron_schedule: String,
	pub min_poll_interval_ms: i64,
	pub rate_limit_delay_ms: i64,
	pub max_consecutive_errors: u32,
	pub history_limit: usize,
	pub new_flag_ttl_ms: u64,
}

impl Default for PollingConfig {
	fn default() -> Self {
		Self {
			cron_schedule: DEFAULT_CRON_SCHEDULE.to_string(),
			min_poll_interval_ms: DEFAULT_MIN_POLL_INTERVAL_MS,
			rate_limit_delay_ms: DEFAULT_RATE_LIMIT_DELAY_MS,
			max_consecutive_errors: DEFAULT_MAX_CONSECUTIVE_ERRORS,
			history_limit: DEFAULT_HISTORY_LIMIT,
			new_flag_ttl_ms: DEFAULT_NEW_FLAG_TTL_MS,
		}
	}
}

/// Optional alert sinks; console output is always on
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationsConfig {
	pub webhook: Option<WebhookSinkConfig>,
	pub command: Option<CommandSinkConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WebhookSinkConfig {
	pub url: String,
	#[serde(default)]
	pub secret: Option<String>,
}

/// Local program invoked per alert, e.g. a desktop notification tool
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CommandSinkConfig {
	pub path: String,
	#[serde(default)]
	pub args: Vec<String>,
	#[serde(default = "default_command_timeout_ms")]
	pub timeout_ms: u64,
}

fn default_command_timeout_ms() -> u64 {
	5_000
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StatusServerConfig {
	pub enabled: bool,
	pub address: String,
}

impl Default for StatusServerConfig {
	fn default() -> Self {
		Self {
			enabled: false,
			address: DEFAULT_STATUS_SERVER_ADDRESS.to_string(),
		}
	}
}

impl AppConfig {
	/// Loads the configuration file
	///
	/// When no path is given the default location is used, and a missing default file
	/// falls back to built-in defaults. An explicitly given path must exist.
	pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
		let config = match path {
			Some(path) => Self::load_from_path(path)?,
			None => {
				let default_path = Path::new(DEFAULT_CONFIG_PATH);
				if default_path.exists() {
					Self::load_from_path(default_path)?
				} else {
					Self::default()
				}
			}
		};

		config.validate()?;
		Ok(config)
	}

	pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		if !path.exists() {
			return Err(ConfigError::not_found(path));
		}
		let file = std::fs::File::open(path).map_err(|e| ConfigError::unreadable(path, e))?;
		serde_json::from_reader(file).map_err(|e| ConfigError::malformed(path, e))
	}

	/// Applies environment overrides for settings commonly changed per deployment
	pub fn apply_env_overrides(&mut self) {
		if let Ok(enabled) = std::env::var("STATUS_SERVER_ENABLED") {
			self.status_server.enabled = enabled == "true";
		}
		if let Ok(address) = std::env::var("STATUS_SERVER_ADDRESS") {
			self.status_server.address = address;
		}
		if let Ok(path) = std::env::var("STORAGE_PATH") {
			self.storage.path = PathBuf::from(path);
		}
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		let urls = [
			("providers.etherscan_api_url", &self.providers.etherscan_api_url),
			("providers.esplora_api_url", &self.providers.esplora_api_url),
			("providers.etherscan_explorer_url", &self.providers.etherscan_explorer_url),
			("providers.esplora_explorer_url", &self.providers.esplora_explorer_url),
		];
		for (setting, value) in urls {
			if url::Url::parse(value).is_err() {
				return Err(ConfigError::invalid_setting(setting, value, "not a valid URL"));
			}
		}

		if self.providers.request_timeout_ms == 0 {
			return Err(ConfigError::invalid_setting(
				"providers.request_timeout_ms",
				0,
				"must be greater than 0",
			));
		}

		if cron::Schedule::from_str(&self.polling.cron_schedule).is_err() {
			return Err(ConfigError::invalid_setting(
				"polling.cron_schedule",
				&self.polling.cron_schedule,
				"not a cron expression",
			));
		}

		if self.polling.min_poll_interval_ms <= 0 {
			return Err(ConfigError::invalid_setting(
				"polling.min_poll_interval_ms",
				self.polling.min_poll_interval_ms,
				"must be positive",
			));
		}

		if self.polling.rate_limit_delay_ms <= 0 {
			return Err(ConfigError::invalid_setting(
				"polling.rate_limit_delay_ms",
				self.polling.rate_limit_delay_ms,
				"must be positive",
			));
		}

		if self.polling.max_consecutive_errors == 0 {
			return Err(ConfigError::invalid_setting(
				"polling.max_consecutive_errors",
				0,
				"must be greater than 0",
			));
		}

		if self.polling.history_limit == 0 {
			return Err(ConfigError::invalid_setting(
				"polling.history_limit",
				0,
				"must be greater than 0",
			));
		}

		let namespace = &self.storage.namespace;
		if namespace.is_empty()
			|| !namespace
				.chars()
				.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
		{
			return Err(ConfigError::invalid_setting(
				"storage.namespace",
				namespace,
				"only letters, numbers, '-' and '_' are allowed",
			));
		}

		if let Some(webhook) = &self.notifications.webhook {
			if !(webhook.url.starts_with("http://") || webhook.url.starts_with("https://")) {
				return Err(ConfigError::invalid_setting(
					"notifications.webhook.url",
					&webhook.url,
					"must start with http:// or https://",
				));
			}
		}

		if let Some(command) = &self.notifications.command {
			if command.path.trim().is_empty() {
				return Err(ConfigError::invalid_setting(
					"notifications.command.path",
					&command.path,
					"must not be empty",
				));
			}
		}

		Ok(())
	}
}

//! Bootstrap module for initializing services.
//!
//! Opens the state store, builds the chain adapters and the notification sinks from the
//! application configuration, and wires them into the watcher and status services.

use std::{error::Error, sync::Arc};

use crate::{
	models::AppConfig,
	repositories::{JsonFileStore, KeyValueStore, MonitorStateRepository},
	services::{
		blockchain::{BitcoinAdapter, ChainAdapter, EthereumAdapter},
		notification::{EventBus, MessageCatalog, NotificationService},
		status::StatusService,
		txwatcher::{AdapterSet, TxWatcherService},
	},
	utils::http::{create_provider_http_client, HttpRetryConfig},
};

/// Type alias for handling ServiceResult
pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// Services shared by the CLI commands
pub struct Services<S: KeyValueStore + 'static> {
	pub repository: MonitorStateRepository<S>,
	pub notifier: Arc<NotificationService>,
	pub watcher: TxWatcherService<S>,
	pub status: StatusService<S>,
}

/// Opens the persistent store configured in `config`
pub async fn open_store(config: &AppConfig) -> Result<Arc<JsonFileStore>> {
	let store = JsonFileStore::open(&config.storage.path, &config.storage.namespace).await?;
	Ok(Arc::new(store))
}

/// Builds one adapter per chain, sharing a single HTTP client
pub fn create_adapters(config: &AppConfig) -> Result<AdapterSet> {
	let client = create_provider_http_client(
		config.providers.request_timeout(),
		&HttpRetryConfig::with_max_retries(config.providers.max_retries),
	)?;

	let adapters: Vec<Arc<dyn ChainAdapter>> = vec![
		Arc::new(EthereumAdapter::new(
			client.clone(),
			config.providers.etherscan_api_url.clone(),
		)),
		Arc::new(BitcoinAdapter::new(
			client,
			config.providers.esplora_api_url.clone(),
		)),
	];
	Ok(AdapterSet::new(adapters))
}

/// Initializes all services on top of `store`
///
/// # Errors
/// Returns an error if the HTTP clients cannot be built or the store cannot be read
pub async fn initialize_services<S: KeyValueStore + 'static>(
	config: &AppConfig,
	store: Arc<S>,
	adapters: AdapterSet,
) -> Result<Services<S>> {
	let repository = MonitorStateRepository::new(store);

	let language = repository.selected_language().await?;
	let catalog = MessageCatalog::for_language(language.as_deref());
	let notifier = Arc::new(NotificationService::from_config(
		config,
		EventBus::new(),
		catalog,
	)?);

	let watcher = TxWatcherService::new(
		repository.clone(),
		adapters,
		notifier.clone(),
		config.polling.clone(),
	);
	let status = StatusService::new(repository.clone(), watcher.controller_state());

	Ok(Services {
		repository,
		notifier,
		watcher,
		status,
	})
}

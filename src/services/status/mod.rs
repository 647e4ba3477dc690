//! Read-only status query.

mod error;

pub use error::StatusError;

use tokio::sync::watch;

use crate::{
	models::{ChainKind, MonitorStatus, TransactionRecord},
	repositories::{KeyValueStore, MonitorStateRepository},
	services::controller::ControllerState,
};

/// Answers status and history requests from operator surfaces
pub struct StatusService<S: KeyValueStore> {
	repository: MonitorStateRepository<S>,
	controller: Option<watch::Receiver<ControllerState>>,
}

impl<S: KeyValueStore> Clone for StatusService<S> {
	fn clone(&self) -> Self {
		Self {
			repository: self.repository.clone(),
			controller: self.controller.clone(),
		}
	}
}

impl<S: KeyValueStore> StatusService<S> {
	/// Status backed by the controller state a running watcher publishes
	pub fn new(
		repository: MonitorStateRepository<S>,
		controller: watch::Receiver<ControllerState>,
	) -> Self {
		Self {
			repository,
			controller: Some(controller),
		}
	}

	/// Status of persisted configuration only, for processes without a watcher
	///
	/// Controller fields report the idle state.
	pub fn persisted_only(repository: MonitorStateRepository<S>) -> Self {
		Self {
			repository,
			controller: None,
		}
	}

	/// Current configuration flags and controller state
	///
	/// Controller fields are those of the last finished cycle, so an in-flight cycle
	/// never delays the answer.
	pub async fn get_status(&self) -> Result<MonitorStatus, StatusError> {
		let config = self.repository.load_config().await?;
		let last_poll_timestamp = self.repository.last_check_time().await?;
		let state = match &self.controller {
			Some(controller) => *controller.borrow(),
			None => Default::default(),
		};

		let has_eth_address = config.ethereum.has_address();
		let has_btc_address = config.bitcoin.has_address();

		Ok(MonitorStatus {
			has_eth_address,
			has_btc_address,
			has_api_key: config.ethereum.has_credential(),
			eth_enabled: config.ethereum.enabled,
			btc_enabled: config.bitcoin.enabled,
			is_configured: has_eth_address || has_btc_address,
			is_cooling_down: state.is_cooling_down,
			cool_down_until_ms: state.cool_down_until_ms,
			consecutive_error_count: state.consecutive_error_count,
			last_poll_timestamp,
		})
	}

	/// Stored history of `chain`, newest first
	pub async fn transactions(
		&self,
		chain: ChainKind,
	) -> Result<Vec<TransactionRecord>, StatusError> {
		Ok(self.repository.load_history(chain).await?)
	}
}

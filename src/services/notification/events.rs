//! In-process broadcast of detected transactions to live observers.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

use crate::{
	models::{ChainKind, TransactionRecord},
	utils::constants::EVENT_CHANNEL_CAPACITY,
};

/// A newly detected transaction, as delivered to observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionEvent {
	pub network: ChainKind,
	pub tx: TransactionRecord,
}

/// Fire-and-forget event channel
#[derive(Debug, Clone)]
pub struct EventBus {
	sender: broadcast::Sender<TransactionEvent>,
}

impl Default for EventBus {
	fn default() -> Self {
		Self::new()
	}
}

impl EventBus {
	pub fn new() -> Self {
		let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
		Self { sender }
	}

	/// Publishes an event; having no observer is not an error
	pub fn publish(&self, event: TransactionEvent) {
		if self.sender.send(event).is_err() {
			trace!("no observers for transaction event");
		}
	}

	pub fn subscribe(&self) -> broadcast::Receiver<TransactionEvent> {
		self.sender.subscribe()
	}
}

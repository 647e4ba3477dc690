//! Alert construction and delivery.
//!
//! - `service`: builds alerts and dispatches them to sinks
//! - sinks: console, webhook and local command
//! - `events`: broadcast of detected transactions to live observers
//! - `templates`: message catalog with `${var}` substitution

use async_trait::async_trait;

mod alert;
mod command;
mod console;
mod error;
mod events;
mod service;
mod templates;
mod webhook;

pub use alert::{Alert, AlertPriority};
pub use command::CommandSink;
pub use console::ConsoleSink;
pub use error::NotificationError;
pub use events::{EventBus, TransactionEvent};
pub use service::{ExplorerUrls, NotificationService, TransactionNotifier};
pub use templates::{format_template, MessageCatalog};
pub use webhook::{WebhookSink, SIGNATURE_HEADER, TIMESTAMP_HEADER};

/// A destination for alerts
#[async_trait]
pub trait AlertSink: Send + Sync {
	/// Short name used in logs and metrics
	fn name(&self) -> &'static str;

	async fn deliver(&self, alert: &Alert) -> Result<(), NotificationError>;
}

//! Notification dispatch.
//!
//! Builds alerts for new transactions and controller conditions, hands them to every
//! configured sink and broadcasts transaction events to live observers. Delivery
//! failures are logged and never reach the caller.

use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tracing::{info, warn};

use crate::{
	models::{AppConfig, ChainKind, TransactionRecord},
	services::{
		controller::ConditionKind,
		notification::{
			Alert, AlertPriority, AlertSink, CommandSink, ConsoleSink, EventBus,
			MessageCatalog, NotificationError, TransactionEvent, WebhookSink,
		},
	},
	utils::{
		http::{create_provider_http_client, HttpRetryConfig},
		metrics::ALERTS_TOTAL,
	},
};

/// Receives everything the poll cycle wants to tell the operator
#[async_trait]
pub trait TransactionNotifier: Send + Sync {
	/// Announces a newly detected transaction on `chain` for `address`
	async fn notify_new_transaction(
		&self,
		chain: ChainKind,
		record: &TransactionRecord,
		address: &str,
	);

	/// Announces a controller condition
	async fn notify_condition(&self, kind: ConditionKind);
}

/// Explorer address pages opened from transaction alerts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerUrls {
	pub ethereum: String,
	pub bitcoin: String,
}

impl ExplorerUrls {
	pub fn address_url(&self, chain: ChainKind, address: &str) -> String {
		let base = match chain {
			ChainKind::Ethereum => &self.ethereum,
			ChainKind::Bitcoin => &self.bitcoin,
		};
		format!("{}/address/{}", base.trim_end_matches('/'), address)
	}
}

pub struct NotificationService {
	sinks: Vec<Arc<dyn AlertSink>>,
	events: EventBus,
	catalog: MessageCatalog,
	explorers: ExplorerUrls,
	rate_limit_delay: Duration,
}

impl NotificationService {
	pub fn new(
		sinks: Vec<Arc<dyn AlertSink>>,
		events: EventBus,
		catalog: MessageCatalog,
		explorers: ExplorerUrls,
		rate_limit_delay: Duration,
	) -> Self {
		Self {
			sinks,
			events,
			catalog,
			explorers,
			rate_limit_delay,
		}
	}

	/// Builds the service with the console sink plus the sinks enabled in `config`
	pub fn from_config(
		config: &AppConfig,
		events: EventBus,
		catalog: MessageCatalog,
	) -> Result<Self, NotificationError> {
		let mut sinks: Vec<Arc<dyn AlertSink>> = vec![Arc::new(ConsoleSink)];

		if let Some(webhook) = &config.notifications.webhook {
			let client = create_provider_http_client(
				config.providers.request_timeout(),
				&HttpRetryConfig::default(),
			)
			.map_err(|e| {
				NotificationError::config_error(format!("Failed to create HTTP client: {}", e))
			})?;
			sinks.push(Arc::new(WebhookSink::new(
				client,
				webhook.url.clone(),
				webhook.secret.clone(),
			)));
		}

		if let Some(command) = &config.notifications.command {
			sinks.push(Arc::new(CommandSink::new(
				command.path.clone(),
				command.args.clone(),
				Duration::from_millis(command.timeout_ms),
			)));
		}

		info!(
			sinks = ?sinks.iter().map(|s| s.name()).collect::<Vec<_>>(),
			"notification sinks ready"
		);

		Ok(Self::new(
			sinks,
			events,
			catalog,
			ExplorerUrls {
				ethereum: config.providers.etherscan_explorer_url.clone(),
				bitcoin: config.providers.esplora_explorer_url.clone(),
			},
			Duration::from_millis(config.polling.rate_limit_delay_ms.max(0) as u64),
		))
	}

	pub fn events(&self) -> &EventBus {
		&self.events
	}

	/// Alert announcing a new transaction, keyed `{chain}_tx_{now_ms}`
	pub fn transaction_alert(
		&self,
		chain: ChainKind,
		record: &TransactionRecord,
		address: &str,
		now_ms: i64,
	) -> Alert {
		let title_key = match chain {
			ChainKind::Ethereum => "newEthTransactionTitle",
			ChainKind::Bitcoin => "newBtcTransactionTitle",
		};
		let variables = HashMap::from([
			("hash".to_string(), record.short_hash()),
			("amount".to_string(), record.amount.clone()),
			(
				"direction".to_string(),
				record.direction.label().to_string(),
			),
		]);

		Alert {
			key: format!("{}_tx_{}", chain.tag(), now_ms),
			title: self.catalog.text(title_key),
			body: self.catalog.render("transactionDetailsMessage", &variables),
			url: Some(self.explorers.address_url(chain, address)),
			priority: AlertPriority::High,
		}
	}

	pub fn condition_alert(&self, kind: ConditionKind) -> Alert {
		let (title_key, body_key, priority) = match kind {
			ConditionKind::RateLimited => {
				("rateLimitTitle", "rateLimitMessage", AlertPriority::Normal)
			}
			ConditionKind::InvalidCredential => (
				"invalidApiKeyTitle",
				"invalidApiKeyMessage",
				AlertPriority::High,
			),
			ConditionKind::TooManyErrors => (
				"tooManyErrorsTitle",
				"tooManyErrorsMessage",
				AlertPriority::High,
			),
		};
		let variables = HashMap::from([(
			"delay_secs".to_string(),
			self.rate_limit_delay.as_secs().to_string(),
		)]);

		Alert {
			key: kind.key().to_string(),
			title: self.catalog.text(title_key),
			body: self.catalog.render(body_key, &variables),
			url: None,
			priority,
		}
	}

	/// Hands `alert` to every sink; a failing sink does not stop the others
	pub async fn dispatch(&self, alert: &Alert) {
		for sink in &self.sinks {
			match sink.deliver(alert).await {
				Ok(()) => {
					ALERTS_TOTAL
						.with_label_values(&[sink.name(), "delivered"])
						.inc();
				}
				Err(e) => {
					ALERTS_TOTAL.with_label_values(&[sink.name(), "failed"]).inc();
					warn!(sink = sink.name(), key = %alert.key, error = %e, "alert delivery failed");
				}
			}
		}
	}
}

#[async_trait]
impl TransactionNotifier for NotificationService {
	async fn notify_new_transaction(
		&self,
		chain: ChainKind,
		record: &TransactionRecord,
		address: &str,
	) {
		let alert = self.transaction_alert(
			chain,
			record,
			address,
			chrono::Utc::now().timestamp_millis(),
		);
		self.dispatch(&alert).await;
		self.events.publish(TransactionEvent {
			network: chain,
			tx: record.clone(),
		});
	}

	async fn notify_condition(&self, kind: ConditionKind) {
		let alert = self.condition_alert(kind);
		self.dispatch(&alert).await;
	}
}

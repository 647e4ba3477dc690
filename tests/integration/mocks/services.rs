use async_trait::async_trait;
use mockall::mock;

use dual_chain_notifier::{
	models::{ChainKind, TransactionRecord},
	services::{
		controller::ConditionKind,
		notification::{Alert, AlertSink, NotificationError, TransactionNotifier},
	},
};

mock! {
	pub TransactionNotifier {}

	#[async_trait]
	impl TransactionNotifier for TransactionNotifier {
		async fn notify_new_transaction(
			&self,
			chain: ChainKind,
			record: &TransactionRecord,
			address: &str,
		);
		async fn notify_condition(&self, kind: ConditionKind);
	}
}

mock! {
	pub AlertSink {}

	#[async_trait]
	impl AlertSink for AlertSink {
		fn name(&self) -> &'static str;
		async fn deliver(&self, alert: &Alert) -> Result<(), NotificationError>;
	}
}

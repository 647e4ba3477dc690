use std::{sync::Arc, time::Duration};

use dual_chain_notifier::{
	models::ChainKind,
	services::{
		controller::ConditionKind,
		notification::{
			AlertPriority, AlertSink, EventBus, ExplorerUrls, MessageCatalog, NotificationError,
			NotificationService, TransactionNotifier,
		},
	},
	utils::tests::builders::monitor_config::TEST_ETH_ADDRESS,
};

use crate::integration::mocks::{record, MockAlertSink};

fn explorers() -> ExplorerUrls {
	ExplorerUrls {
		ethereum: "https://etherscan.io".to_string(),
		bitcoin: "https://blockstream.info".to_string(),
	}
}

#[tokio::test]
async fn test_failing_sink_does_not_block_the_next_one() {
	let mut failing = MockAlertSink::new();
	failing.expect_name().return_const("failing");
	failing
		.expect_deliver()
		.times(1)
		.returning(|_| Err(NotificationError::network_error("connection refused")));

	let mut healthy = MockAlertSink::new();
	healthy.expect_name().return_const("healthy");
	healthy
		.expect_deliver()
		.withf(|alert| {
			alert.title == "New Ethereum Transaction"
				&& alert.url.as_deref()
					== Some(format!("https://etherscan.io/address/{}", TEST_ETH_ADDRESS).as_str())
				&& alert.priority == AlertPriority::High
		})
		.times(1)
		.returning(|_| Ok(()));

	let events = EventBus::new();
	let mut observer = events.subscribe();
	let service = NotificationService::new(
		vec![
			Arc::new(failing) as Arc<dyn AlertSink>,
			Arc::new(healthy) as Arc<dyn AlertSink>,
		],
		events,
		MessageCatalog::english(),
		explorers(),
		Duration::from_secs(60),
	);

	service
		.notify_new_transaction(ChainKind::Ethereum, &record("0xAA"), TEST_ETH_ADDRESS)
		.await;

	let event = observer.recv().await.unwrap();
	assert_eq!(event.network, ChainKind::Ethereum);
	assert_eq!(event.tx.hash, "0xAA");
}

#[tokio::test]
async fn test_condition_alerts_use_stable_keys() {
	let mut sink = MockAlertSink::new();
	sink.expect_name().return_const("mock");
	sink.expect_deliver()
		.withf(|alert| {
			alert.key == "rate_limit"
				&& alert.title == "Rate Limited"
				&& alert.body.contains("60")
				&& alert.priority == AlertPriority::Normal
		})
		.times(1)
		.returning(|_| Ok(()));
	sink.expect_deliver()
		.withf(|alert| alert.key == "too_many_errors")
		.times(1)
		.returning(|_| Ok(()));

	let service = NotificationService::new(
		vec![Arc::new(sink) as Arc<dyn AlertSink>],
		EventBus::new(),
		MessageCatalog::english(),
		explorers(),
		Duration::from_secs(60),
	);

	service.notify_condition(ConditionKind::RateLimited).await;
	service.notify_condition(ConditionKind::TooManyErrors).await;
}

#[tokio::test]
async fn test_unknown_language_falls_back_to_english() {
	let service = NotificationService::new(
		vec![],
		EventBus::new(),
		MessageCatalog::for_language(Some("xx")),
		explorers(),
		Duration::from_secs(60),
	);

	let alert = service.condition_alert(ConditionKind::InvalidCredential);
	assert_eq!(alert.title, "Invalid API Key");
	assert_eq!(alert.key, "invalid_api_key");
}

use mockito::Matcher;
use serde_json::json;
use std::sync::Arc;

use dual_chain_notifier::{
	bootstrap::{create_adapters, initialize_services},
	models::{AppConfig, ChainKind, Direction, WebhookSinkConfig},
	repositories::JsonFileStore,
	services::txwatcher::CycleOutcome,
	utils::tests::builders::monitor_config::{
		MonitorConfigBuilder, TEST_API_KEY, TEST_BTC_ADDRESS, TEST_ETH_ADDRESS,
	},
};

fn config_for(explorer: &mockito::ServerGuard, webhook: &mockito::ServerGuard) -> AppConfig {
	let mut config = AppConfig::default();
	config.providers.etherscan_api_url = explorer.url();
	config.providers.esplora_api_url = explorer.url();
	config.providers.max_retries = 0;
	config.notifications.webhook = Some(WebhookSinkConfig {
		url: format!("{}/alerts", webhook.url()),
		secret: None,
	});
	config
}

#[tokio::test]
async fn test_cycle_detects_transactions_on_both_chains_end_to_end() {
	let mut explorer = mockito::Server::new_async().await;
	let mut webhook = mockito::Server::new_async().await;

	let etherscan = explorer
		.mock("GET", "/api")
		.match_query(Matcher::AllOf(vec![
			Matcher::UrlEncoded("module".into(), "account".into()),
			Matcher::UrlEncoded("action".into(), "txlist".into()),
			Matcher::UrlEncoded("address".into(), TEST_ETH_ADDRESS.into()),
			Matcher::UrlEncoded("sort".into(), "desc".into()),
			Matcher::UrlEncoded("apikey".into(), TEST_API_KEY.into()),
		]))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(
			json!({
				"status": "1",
				"message": "OK",
				"result": [{
					"hash": "0xabc123",
					"value": "1500000000000000000",
					"from": "0x1111111111111111111111111111111111111111",
					"to": TEST_ETH_ADDRESS.to_lowercase(),
					"timeStamp": "1700000000",
					"gasPrice": "20000000000",
					"gasUsed": "21000"
				}]
			})
			.to_string(),
		)
		.create_async()
		.await;

	let esplora = explorer
		.mock("GET", format!("/address/{}/txs", TEST_BTC_ADDRESS).as_str())
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(
			json!([{
				"txid": "f00dbabe",
				"fee": 1500,
				"status": {
					"confirmed": true,
					"block_height": 820000,
					"block_time": 1700000100
				},
				"vout": [
					{ "scriptpubkey_address": TEST_BTC_ADDRESS, "value": 250000 },
					{ "scriptpubkey_address": "bc1qother", "value": 1000 }
				]
			}])
			.to_string(),
		)
		.create_async()
		.await;

	let alerts = webhook
		.mock("POST", "/alerts")
		.match_body(Matcher::Regex("New (Ethereum|Bitcoin) Transaction".to_string()))
		.with_status(200)
		.expect(2)
		.create_async()
		.await;

	let config = config_for(&explorer, &webhook);
	let store = Arc::new(JsonFileStore::in_memory("local"));
	let adapters = create_adapters(&config).unwrap();
	let services = initialize_services(&config, store, adapters).await.unwrap();
	services
		.repository
		.save_config(&MonitorConfigBuilder::new().ethereum().bitcoin().build())
		.await
		.unwrap();

	let mut events = services.notifier.events().subscribe();

	let outcome = services.watcher.run_cycle().await.unwrap();
	let Some(CycleOutcome::Completed(report)) = outcome else {
		panic!("cycle did not complete: {:?}", outcome);
	};
	assert_eq!(report.new_transactions.len(), 2);
	assert!(report.failures.is_empty());

	let eth = services
		.status
		.transactions(ChainKind::Ethereum)
		.await
		.unwrap();
	assert_eq!(eth[0].hash, "0xabc123");
	assert_eq!(eth[0].amount, "1.500000 ETH");
	assert_eq!(eth[0].direction, Direction::Incoming);
	assert_eq!(eth[0].timestamp, 1_700_000_000_000);

	let btc = services
		.status
		.transactions(ChainKind::Bitcoin)
		.await
		.unwrap();
	assert_eq!(btc[0].hash, "f00dbabe");
	assert_eq!(btc[0].amount, "0.00250000 BTC");
	assert_eq!(btc[0].direction, Direction::Incoming);
	assert_eq!(btc[0].block_height, Some(820000));

	let first = events.recv().await.unwrap();
	assert_eq!(first.network, ChainKind::Ethereum);
	let second = events.recv().await.unwrap();
	assert_eq!(second.network, ChainKind::Bitcoin);

	etherscan.assert();
	esplora.assert();
	alerts.assert();

	let status = services.status.get_status().await.unwrap();
	assert!(status.is_configured);
	assert_eq!(status.consecutive_error_count, 0);
}

#[tokio::test]
async fn test_rate_limited_provider_raises_alert_and_cools_down() {
	let mut explorer = mockito::Server::new_async().await;
	let mut webhook = mockito::Server::new_async().await;

	let etherscan = explorer
		.mock("GET", "/api")
		.match_query(Matcher::Any)
		.with_status(200)
		.with_body(
			json!({
				"status": "0",
				"message": "NOTOK",
				"result": "Max rate limit reached"
			})
			.to_string(),
		)
		.expect(1)
		.create_async()
		.await;

	let alerts = webhook
		.mock("POST", "/alerts")
		.match_body(Matcher::PartialJson(json!({
			"key": "rate_limit",
			"title": "Rate Limited"
		})))
		.with_status(200)
		.expect(1)
		.create_async()
		.await;

	let config = config_for(&explorer, &webhook);
	let store = Arc::new(JsonFileStore::in_memory("local"));
	let adapters = create_adapters(&config).unwrap();
	let services = initialize_services(&config, store, adapters).await.unwrap();
	services
		.repository
		.save_config(&MonitorConfigBuilder::new().ethereum().build())
		.await
		.unwrap();

	services.watcher.run_cycle().await.unwrap();

	let status = services.status.get_status().await.unwrap();
	assert!(status.is_cooling_down);
	assert_eq!(status.consecutive_error_count, 1);
	assert!(status.cool_down_until_ms > 0);

	etherscan.assert();
	alerts.assert();
}

#[tokio::test]
async fn test_address_without_history_is_not_an_error() {
	let mut explorer = mockito::Server::new_async().await;
	let webhook = mockito::Server::new_async().await;

	let etherscan = explorer
		.mock("GET", "/api")
		.match_query(Matcher::Any)
		.with_status(200)
		.with_body(
			json!({
				"status": "0",
				"message": "No transactions found",
				"result": []
			})
			.to_string(),
		)
		.create_async()
		.await;

	let config = config_for(&explorer, &webhook);
	let store = Arc::new(JsonFileStore::in_memory("local"));
	let adapters = create_adapters(&config).unwrap();
	let services = initialize_services(&config, store, adapters).await.unwrap();
	services
		.repository
		.save_config(&MonitorConfigBuilder::new().ethereum().build())
		.await
		.unwrap();

	let outcome = services.watcher.run_cycle().await.unwrap();
	let Some(CycleOutcome::Completed(report)) = outcome else {
		panic!("cycle did not complete: {:?}", outcome);
	};
	assert!(report.failures.is_empty());
	assert!(report.new_transactions.is_empty());

	etherscan.assert();
}

use serde_json::json;
use std::time::Duration;

use dual_chain_notifier::{
	models::Direction,
	services::blockchain::{BitcoinAdapter, ChainAdapter, FetchError},
	utils::{
		http::{create_provider_http_client, HttpRetryConfig},
		tests::builders::monitor_config::TEST_BTC_ADDRESS,
	},
};

fn adapter(base_url: String, max_retries: u32) -> BitcoinAdapter {
	let client = create_provider_http_client(
		Duration::from_secs(5),
		&HttpRetryConfig {
			max_retries,
			initial_backoff: Duration::from_millis(1),
			max_backoff: Duration::from_millis(5),
			..HttpRetryConfig::default()
		},
	)
	.unwrap();
	BitcoinAdapter::new(client, base_url)
}

fn txs_path() -> String {
	format!("/address/{}/txs", TEST_BTC_ADDRESS)
}

#[tokio::test]
async fn test_payment_to_other_address_is_outgoing_with_zero_amount() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("GET", txs_path().as_str())
		.with_status(200)
		.with_body(
			json!([{
				"txid": "deadbeef",
				"fee": 2500,
				"status": { "confirmed": true, "block_height": 830001, "block_time": 1700000000 },
				"vout": [
					{ "scriptpubkey_address": "bc1qsomeoneelse0000000000000000000000000", "value": 90000 },
					{ "scriptpubkey_type": "op_return", "value": 0 }
				]
			}])
			.to_string(),
		)
		.create_async()
		.await;

	let records = adapter(server.url(), 0)
		.fetch_latest(TEST_BTC_ADDRESS, None)
		.await
		.unwrap();

	assert_eq!(records.len(), 1);
	assert_eq!(records[0].amount, "0.00000000 BTC");
	assert_eq!(records[0].direction, Direction::Outgoing);
	assert_eq!(records[0].block_height, Some(830001));
	assert_eq!(records[0].fee, Some(0.000025));
	assert_eq!(records[0].timestamp, 1_700_000_000_000);
	mock.assert();
}

#[tokio::test]
async fn test_empty_history_is_empty_list() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("GET", txs_path().as_str())
		.with_status(200)
		.with_body("[]")
		.create_async()
		.await;

	let records = adapter(server.url(), 0)
		.fetch_latest(TEST_BTC_ADDRESS, None)
		.await
		.unwrap();

	assert!(records.is_empty());
	mock.assert();
}

#[tokio::test]
async fn test_bad_request_is_rejected_with_body() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("GET", txs_path().as_str())
		.with_status(400)
		.with_body("Invalid Bitcoin address")
		.expect(1)
		.create_async()
		.await;

	let error = adapter(server.url(), 2)
		.fetch_latest(TEST_BTC_ADDRESS, None)
		.await
		.unwrap_err();

	assert_eq!(
		error,
		FetchError::ProviderRejected {
			status: 400,
			message: "Invalid Bitcoin address".to_string(),
		}
	);
	// Client errors are not retried
	mock.assert();
}

#[tokio::test]
async fn test_server_errors_are_retried() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("GET", txs_path().as_str())
		.with_status(503)
		.expect(3)
		.create_async()
		.await;

	let error = adapter(server.url(), 2)
		.fetch_latest(TEST_BTC_ADDRESS, None)
		.await
		.unwrap_err();

	assert_eq!(error.status(), Some(503));
	mock.assert();
}

use mockito::Matcher;
use serde_json::json;
use std::time::Duration;

use dual_chain_notifier::{
	models::Direction,
	services::blockchain::{ChainAdapter, EthereumAdapter, FetchError},
	utils::{
		http::{create_provider_http_client, HttpRetryConfig},
		tests::builders::monitor_config::{TEST_API_KEY, TEST_ETH_ADDRESS},
	},
};

fn adapter(base_url: String) -> EthereumAdapter {
	let client = create_provider_http_client(
		Duration::from_secs(5),
		&HttpRetryConfig {
			max_retries: 0,
			..HttpRetryConfig::default()
		},
	)
	.unwrap();
	EthereumAdapter::new(client, base_url)
}

#[tokio::test]
async fn test_fetch_requests_newest_first_page() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("GET", "/api")
		.match_query(Matcher::AllOf(vec![
			Matcher::UrlEncoded("module".into(), "account".into()),
			Matcher::UrlEncoded("action".into(), "txlist".into()),
			Matcher::UrlEncoded("address".into(), TEST_ETH_ADDRESS.into()),
			Matcher::UrlEncoded("startblock".into(), "0".into()),
			Matcher::UrlEncoded("endblock".into(), "99999999".into()),
			Matcher::UrlEncoded("page".into(), "1".into()),
			Matcher::UrlEncoded("offset".into(), "10".into()),
			Matcher::UrlEncoded("sort".into(), "desc".into()),
			Matcher::UrlEncoded("apikey".into(), TEST_API_KEY.into()),
		]))
		.with_status(200)
		.with_body(
			json!({
				"status": "1",
				"message": "OK",
				"result": [
					{
						"hash": "0x02",
						"value": "250000000000000000",
						"from": TEST_ETH_ADDRESS.to_uppercase().replace("0X", "0x"),
						"to": "0x2222222222222222222222222222222222222222",
						"timeStamp": "1700000060"
					},
					{
						"hash": "0x01",
						"from": "0x2222222222222222222222222222222222222222",
						"to": TEST_ETH_ADDRESS,
						"timeStamp": "1700000000"
					}
				]
			})
			.to_string(),
		)
		.create_async()
		.await;

	let records = adapter(server.url())
		.fetch_latest(TEST_ETH_ADDRESS, Some(TEST_API_KEY))
		.await
		.unwrap();

	assert_eq!(records.len(), 2);
	assert_eq!(records[0].hash, "0x02");
	assert_eq!(records[0].amount, "0.250000 ETH");
	assert_eq!(records[0].direction, Direction::Outgoing);
	assert_eq!(records[0].timestamp, 1_700_000_060_000);
	assert_eq!(records[1].amount, "N/A");
	assert_eq!(records[1].direction, Direction::Incoming);
	mock.assert();
}

#[tokio::test]
async fn test_notok_result_becomes_application_error() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("GET", "/api")
		.match_query(Matcher::Any)
		.with_status(200)
		.with_body(
			json!({
				"status": "0",
				"message": "NOTOK",
				"result": "Invalid API Key"
			})
			.to_string(),
		)
		.create_async()
		.await;

	let error = adapter(server.url())
		.fetch_latest(TEST_ETH_ADDRESS, Some(TEST_API_KEY))
		.await
		.unwrap_err();

	assert_eq!(
		error,
		FetchError::Application("NOTOK: Invalid API Key".to_string())
	);
	mock.assert();
}

#[tokio::test]
async fn test_http_429_is_rejected_with_status() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("GET", "/api")
		.match_query(Matcher::Any)
		.with_status(429)
		.with_body("Too Many Requests")
		.expect(1)
		.create_async()
		.await;

	let error = adapter(server.url())
		.fetch_latest(TEST_ETH_ADDRESS, Some(TEST_API_KEY))
		.await
		.unwrap_err();

	assert_eq!(error.status(), Some(429));
	assert_eq!(error.kind(), "provider_rejected");
	mock.assert();
}

#[tokio::test]
async fn test_missing_key_fails_without_request() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("GET", "/api")
		.match_query(Matcher::Any)
		.expect(0)
		.create_async()
		.await;

	let error = adapter(server.url())
		.fetch_latest(TEST_ETH_ADDRESS, None)
		.await
		.unwrap_err();

	assert_eq!(error.kind(), "application");
	mock.assert();
}

#[tokio::test]
async fn test_malformed_body_is_application_error() {
	let mut server = mockito::Server::new_async().await;
	let _mock = server
		.mock("GET", "/api")
		.match_query(Matcher::Any)
		.with_status(200)
		.with_body("<html>maintenance</html>")
		.create_async()
		.await;

	let error = adapter(server.url())
		.fetch_latest(TEST_ETH_ADDRESS, Some(TEST_API_KEY))
		.await
		.unwrap_err();

	assert!(matches!(error, FetchError::Application(_)));
}

#[tokio::test]
async fn test_unreachable_provider_is_network_error() {
	// Nothing listens on the discard port
	let error = adapter("http://127.0.0.1:9".to_string())
		.fetch_latest(TEST_ETH_ADDRESS, Some(TEST_API_KEY))
		.await
		.unwrap_err();

	assert_eq!(error.kind(), "network");
}

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{
	default_on_request_failure, policies::ExponentialBackoff, Jitter, RetryTransientMiddleware,
	Retryable, RetryableStrategy,
};
use std::time::Duration;

/// Configuration for HTTP retry policies
#[derive(Debug, Clone)]
pub struct HttpRetryConfig {
	/// Maximum number of retries for transient errors
	pub max_retries: u32,
	/// Base duration for exponential backoff calculations
	pub base_for_backoff: u32,
	/// Initial backoff duration before the first retry
	pub initial_backoff: Duration,
	/// Maximum backoff duration for retries
	pub max_backoff: Duration,
	/// Jitter to apply to the backoff duration
	pub jitter: Jitter,
}

impl Default for HttpRetryConfig {
	fn default() -> Self {
		Self {
			max_retries: 1,
			base_for_backoff: 2,
			initial_backoff: Duration::from_millis(250),
			max_backoff: Duration::from_secs(2),
			jitter: Jitter::Full,
		}
	}
}

impl HttpRetryConfig {
	pub fn with_max_retries(max_retries: u32) -> Self {
		Self {
			max_retries,
			..Self::default()
		}
	}
}

/// Retries transport failures and server errors only
///
/// Client errors, including 429, are returned as-is so the rate controller sees them.
pub struct TransientErrorRetryStrategy;

impl RetryableStrategy for TransientErrorRetryStrategy {
	fn handle(
		&self,
		res: &Result<reqwest::Response, reqwest_middleware::Error>,
	) -> Option<Retryable> {
		match res {
			Ok(response) if response.status().is_server_error() => Some(Retryable::Transient),
			Ok(_) => None,
			Err(error) => default_on_request_failure(error),
		}
	}
}

/// Creates a retryable HTTP client with middleware
///
/// # Parameters:
/// - `config`: Configuration for retry policies
/// - `base_client`: The base HTTP client to use
/// - `custom_strategy`: Optional custom retry strategy, replacing the default retry behavior
pub fn create_retryable_http_client<S>(
	config: &HttpRetryConfig,
	base_client: reqwest::Client,
	custom_strategy: Option<S>,
) -> ClientWithMiddleware
where
	S: RetryableStrategy + Send + Sync + 'static,
{
	let retry_policy = ExponentialBackoff::builder()
		.base(config.base_for_backoff)
		.retry_bounds(config.initial_backoff, config.max_backoff)
		.jitter(config.jitter)
		.build_with_max_retries(config.max_retries);

	if let Some(strategy) = custom_strategy {
		ClientBuilder::new(base_client).with(
			RetryTransientMiddleware::new_with_policy_and_strategy(retry_policy, strategy),
		)
	} else {
		ClientBuilder::new(base_client)
			.with(RetryTransientMiddleware::new_with_policy(retry_policy))
	}
	.build()
}

/// Builds the client shared by the chain adapters
///
/// Every request is bounded by `timeout`; retries only cover transient failures.
pub fn create_provider_http_client(
	timeout: Duration,
	retry_config: &HttpRetryConfig,
) -> Result<ClientWithMiddleware, reqwest::Error> {
	let base_client = reqwest::Client::builder()
		.timeout(timeout)
		.connect_timeout(timeout)
		.pool_idle_timeout(Some(Duration::from_secs(90)))
		.user_agent(concat!("dual-chain-notifier/", env!("CARGO_PKG_VERSION")))
		.build()?;

	Ok(create_retryable_http_client(
		retry_config,
		base_client,
		Some(TransientErrorRetryStrategy),
	))
}

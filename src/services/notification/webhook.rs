//! Webhook alert sink.
//!
//! Posts each alert as JSON. When a secret is configured the request carries an
//! HMAC-SHA256 signature of the body and timestamp in `X-Signature` / `X-Timestamp`.

use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest_middleware::ClientWithMiddleware;
use sha2::Sha256;

use crate::services::notification::{Alert, AlertSink, NotificationError};

/// HMAC SHA256 type alias
type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "X-Signature";
pub const TIMESTAMP_HEADER: &str = "X-Timestamp";

/// Delivers alerts to an HTTP endpoint
pub struct WebhookSink {
	client: ClientWithMiddleware,
	url: String,
	secret: Option<String>,
}

impl WebhookSink {
	/// Creates a new webhook sink
	///
	/// # Arguments
	/// * `client` - HTTP client used for delivery
	/// * `url` - Endpoint receiving the alerts
	/// * `secret` - Optional signing secret
	pub fn new(client: ClientWithMiddleware, url: String, secret: Option<String>) -> Self {
		Self {
			client,
			url,
			secret: secret.filter(|s| !s.is_empty()),
		}
	}

	/// Signs `payload` followed by `timestamp`, returning the hex encoded signature
	pub fn sign_payload(
		secret: &str,
		payload: &str,
		timestamp: i64,
	) -> Result<String, NotificationError> {
		let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
			.map_err(|e| NotificationError::config_error(format!("Invalid secret: {}", e)))?;
		mac.update(payload.as_bytes());
		mac.update(timestamp.to_string().as_bytes());
		Ok(hex::encode(mac.finalize().into_bytes()))
	}

	fn headers(&self, payload: &str) -> Result<HeaderMap, NotificationError> {
		let mut headers = HeaderMap::new();
		headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

		if let Some(secret) = &self.secret {
			let timestamp = Utc::now().timestamp_millis();
			let signature = Self::sign_payload(secret, payload, timestamp)?;
			let invalid = |e: reqwest::header::InvalidHeaderValue| {
				NotificationError::internal_error(format!("Invalid header value: {}", e))
			};
			headers.insert(
				SIGNATURE_HEADER,
				HeaderValue::from_str(&signature).map_err(invalid)?,
			);
			headers.insert(
				TIMESTAMP_HEADER,
				HeaderValue::from_str(&timestamp.to_string()).map_err(invalid)?,
			);
		}
		Ok(headers)
	}
}

#[async_trait]
impl AlertSink for WebhookSink {
	fn name(&self) -> &'static str {
		"webhook"
	}

	async fn deliver(&self, alert: &Alert) -> Result<(), NotificationError> {
		let payload = serde_json::to_string(alert)?;
		let headers = self.headers(&payload)?;

		let response = self
			.client
			.post(self.url.as_str())
			.headers(headers)
			.body(payload)
			.send()
			.await?;

		if !response.status().is_success() {
			return Err(NotificationError::network_error(format!(
				"Webhook returned error status: {}",
				response.status()
			)));
		}
		Ok(())
	}
}

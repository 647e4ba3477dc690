use async_trait::async_trait;
use tracing::info;

use crate::services::notification::{Alert, AlertSink, NotificationError};

/// Writes alerts to the application log
#[derive(Debug, Clone, Default)]
pub struct ConsoleSink;

#[async_trait]
impl AlertSink for ConsoleSink {
	fn name(&self) -> &'static str {
		"console"
	}

	async fn deliver(&self, alert: &Alert) -> Result<(), NotificationError> {
		info!(
			key = %alert.key,
			url = alert.url.as_deref().unwrap_or(""),
			"{}: {}",
			alert.title,
			alert.body.replace('\n', " | ")
		);
		Ok(())
	}
}

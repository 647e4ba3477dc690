//! Local command alert sink.
//!
//! Runs a configured program once per alert, e.g. a desktop notification tool. The
//! alert is passed in the `ALERT_KEY`, `ALERT_TITLE`, `ALERT_BODY` and `ALERT_URL`
//! environment variables.

use async_trait::async_trait;
use std::{process::Stdio, time::Duration};
use tokio::time::timeout;

use crate::services::notification::{Alert, AlertSink, NotificationError};

pub struct CommandSink {
	path: String,
	args: Vec<String>,
	timeout: Duration,
}

impl CommandSink {
	pub fn new(path: String, args: Vec<String>, timeout: Duration) -> Self {
		Self {
			path,
			args,
			timeout,
		}
	}
}

#[async_trait]
impl AlertSink for CommandSink {
	fn name(&self) -> &'static str {
		"command"
	}

	async fn deliver(&self, alert: &Alert) -> Result<(), NotificationError> {
		let child = tokio::process::Command::new(&self.path)
			.args(&self.args)
			.env("ALERT_KEY", &alert.key)
			.env("ALERT_TITLE", &alert.title)
			.env("ALERT_BODY", &alert.body)
			.env("ALERT_URL", alert.url.as_deref().unwrap_or(""))
			.stdin(Stdio::null())
			.stdout(Stdio::null())
			.stderr(Stdio::piped())
			.kill_on_drop(true)
			.spawn()
			.map_err(|e| {
				NotificationError::execution_error(format!(
					"Failed to start {}: {}",
					self.path, e
				))
			})?;

		let output = match timeout(self.timeout, child.wait_with_output()).await {
			Ok(result) => result.map_err(|e| NotificationError::execution_error(e.to_string()))?,
			Err(_) => {
				return Err(NotificationError::execution_error(format!(
					"{} timed out after {:?}",
					self.path, self.timeout
				)))
			}
		};

		if !output.status.success() {
			let stderr = String::from_utf8_lossy(&output.stderr);
			return Err(NotificationError::execution_error(format!(
				"{} exited with {}: {}",
				self.path,
				output.status,
				stderr.trim()
			)));
		}
		Ok(())
	}
}

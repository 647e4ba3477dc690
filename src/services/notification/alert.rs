use serde::{Deserialize, Serialize};

/// How prominently a sink should present an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertPriority {
	Normal,
	High,
}

/// A user-facing alert
///
/// Alerts sharing a `key` replace each other on surfaces that support it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
	pub key: String,
	pub title: String,
	pub body: String,
	/// Page opened when the alert is clicked
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
	pub priority: AlertPriority,
}

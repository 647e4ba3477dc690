//! Alert message catalog and `${var}` template substitution.

use std::collections::HashMap;
use tracing::debug;

const ENGLISH: &[(&str, &str)] = &[
	("newEthTransactionTitle", "New Ethereum Transaction"),
	("newBtcTransactionTitle", "New Bitcoin Transaction"),
	(
		"transactionDetailsMessage",
		"Hash: ${hash}\nAmount: ${amount}\nType: ${direction}",
	),
	("rateLimitTitle", "Rate Limited"),
	(
		"rateLimitMessage",
		"Rate limit reached. Monitoring paused for ${delay_secs} seconds.",
	),
	("invalidApiKeyTitle", "Invalid API Key"),
	(
		"invalidApiKeyMessage",
		"Your Etherscan API key appears to be invalid. Please check and update it.",
	),
	("tooManyErrorsTitle", "Too Many Errors"),
	(
		"tooManyErrorsMessage",
		"Too many consecutive errors. Monitoring continues and will retry every cycle.",
	),
];

/// Replaces every `${name}` in `template` with its value
///
/// Placeholders without a value are left untouched.
pub fn format_template(template: &str, variables: &HashMap<String, String>) -> String {
	let mut message = template.to_string();
	for (key, value) in variables {
		message = message.replace(&format!("${{{}}}", key), value);
	}
	message
}

/// Message texts keyed by message id
#[derive(Debug, Clone)]
pub struct MessageCatalog {
	messages: HashMap<&'static str, &'static str>,
}

impl Default for MessageCatalog {
	fn default() -> Self {
		Self::english()
	}
}

impl MessageCatalog {
	pub fn english() -> Self {
		Self {
			messages: ENGLISH.iter().copied().collect(),
		}
	}

	/// Catalog for the stored language preference
	///
	/// Only English is built in; other languages fall back to it.
	pub fn for_language(language: Option<&str>) -> Self {
		if let Some(lang) = language.filter(|l| !l.starts_with("en")) {
			debug!(language = %lang, "no catalog for language, using English");
		}
		Self::english()
	}

	/// Renders message `key`; an unknown key renders as the key itself
	pub fn render(&self, key: &str, variables: &HashMap<String, String>) -> String {
		match self.messages.get(key) {
			Some(template) => format_template(template, variables),
			None => key.to_string(),
		}
	}

	pub fn text(&self, key: &str) -> String {
		self.render(key, &HashMap::new())
	}
}

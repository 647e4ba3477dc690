//! Classification of provider failures.

/// Phrases a provider uses when throttling requests
const RATE_LIMIT_PHRASES: &[&str] = &["rate limit"];

/// Phrases a provider uses when the API key is not accepted
const INVALID_CREDENTIAL_PHRASES: &[&str] = &["invalid api key"];

const HTTP_TOO_MANY_REQUESTS: u16 = 429;

/// Signals extracted from a failed fetch
///
/// Both flags may be set at once; each one drives its own reaction in the controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailureClass {
	pub rate_limited: bool,
	pub invalid_credential: bool,
}

impl FailureClass {
	/// Neither a rate limit nor a credential problem
	pub fn is_generic(&self) -> bool {
		!self.rate_limited && !self.invalid_credential
	}
}

/// Classifies a failure from its message and optional HTTP status
///
/// Matching is case-insensitive substring matching against the phrase lists above.
pub fn classify_failure(message: &str, status: Option<u16>) -> FailureClass {
	let message = message.to_lowercase();
	let contains_any = |phrases: &[&str]| phrases.iter().any(|p| message.contains(p));

	FailureClass {
		rate_limited: status == Some(HTTP_TOO_MANY_REQUESTS) || contains_any(RATE_LIMIT_PHRASES),
		invalid_credential: contains_any(INVALID_CREDENTIAL_PHRASES),
	}
}

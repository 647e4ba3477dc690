//! Rate-limit and error backoff state machine.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
	models::PollingConfig,
	services::controller::classify::classify_failure,
	utils::constants::{
		DEFAULT_MAX_CONSECUTIVE_ERRORS, DEFAULT_MIN_POLL_INTERVAL_MS,
		DEFAULT_RATE_LIMIT_DELAY_MS, THROTTLE_DRIFT_TOLERANCE_MS,
	},
};

/// Conditions surfaced to the operator as alerts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
	RateLimited,
	InvalidCredential,
	TooManyErrors,
}

impl ConditionKind {
	/// Stable alert key; alerts with the same key replace each other
	pub fn key(&self) -> &'static str {
		match self {
			Self::RateLimited => "rate_limit",
			Self::InvalidCredential => "invalid_api_key",
			Self::TooManyErrors => "too_many_errors",
		}
	}
}

/// In-memory controller state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerState {
	pub consecutive_error_count: u32,
	pub is_cooling_down: bool,
	pub cool_down_until_ms: i64,
}

/// Timing and threshold settings of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
	pub min_poll_interval_ms: i64,
	pub rate_limit_delay_ms: i64,
	pub max_consecutive_errors: u32,
	pub drift_tolerance_ms: i64,
}

impl Default for ControllerSettings {
	fn default() -> Self {
		Self {
			min_poll_interval_ms: DEFAULT_MIN_POLL_INTERVAL_MS,
			rate_limit_delay_ms: DEFAULT_RATE_LIMIT_DELAY_MS,
			max_consecutive_errors: DEFAULT_MAX_CONSECUTIVE_ERRORS,
			drift_tolerance_ms: THROTTLE_DRIFT_TOLERANCE_MS,
		}
	}
}

impl From<&PollingConfig> for ControllerSettings {
	fn from(config: &PollingConfig) -> Self {
		Self {
			min_poll_interval_ms: config.min_poll_interval_ms,
			rate_limit_delay_ms: config.rate_limit_delay_ms,
			max_consecutive_errors: config.max_consecutive_errors,
			drift_tolerance_ms: THROTTLE_DRIFT_TOLERANCE_MS,
		}
	}
}

/// Tracks consecutive failures and the rate-limit cool-down window
///
/// States are Normal, CoolingDown and Exhausted. Exhausted only raises an alert;
/// polling continues once any cool-down has expired.
#[derive(Debug, Clone, Default)]
pub struct RateController {
	settings: ControllerSettings,
	state: ControllerState,
}

impl RateController {
	pub fn new(settings: ControllerSettings) -> Self {
		Self {
			settings,
			state: ControllerState::default(),
		}
	}

	pub fn settings(&self) -> &ControllerSettings {
		&self.settings
	}

	pub fn state(&self) -> ControllerState {
		self.state
	}

	/// Returns false while a cool-down window is active
	///
	/// An expired window is cleared here and the error count starts over.
	pub fn can_poll(&mut self, now_ms: i64) -> bool {
		if !self.state.is_cooling_down {
			return true;
		}
		if now_ms < self.state.cool_down_until_ms {
			return false;
		}
		info!("rate limit cool-down expired, resuming polling");
		self.state.is_cooling_down = false;
		self.state.consecutive_error_count = 0;
		true
	}

	/// Returns false when the previous admitted cycle started too recently
	pub fn admit_throttle(&self, now_ms: i64, last_poll_ms: Option<i64>) -> bool {
		let Some(last_poll_ms) = last_poll_ms else {
			return true;
		};
		let window = if self.state.is_cooling_down {
			self.settings
				.min_poll_interval_ms
				.max(self.settings.rate_limit_delay_ms)
		} else {
			self.settings.min_poll_interval_ms
		};
		now_ms.saturating_sub(last_poll_ms) >= window - self.settings.drift_tolerance_ms
	}

	pub fn record_success(&mut self) {
		self.state.consecutive_error_count = 0;
	}

	/// Counts a failure and returns the conditions it raises
	///
	/// # Arguments
	/// * `message` - Error message, inspected for provider phrases
	/// * `status` - HTTP status of the failed response, if any
	/// * `now_ms` - Current time in epoch milliseconds
	pub fn record_failure(
		&mut self,
		message: &str,
		status: Option<u16>,
		now_ms: i64,
	) -> Vec<ConditionKind> {
		let mut conditions = Vec::new();
		self.state.consecutive_error_count = self.state.consecutive_error_count.saturating_add(1);

		let class = classify_failure(message, status);
		if class.rate_limited {
			if !self.state.is_cooling_down {
				conditions.push(ConditionKind::RateLimited);
			}
			self.state.is_cooling_down = true;
			self.state.cool_down_until_ms = now_ms + self.settings.rate_limit_delay_ms;
			warn!(
				until = self.state.cool_down_until_ms,
				"provider rate limit reached, cooling down"
			);
		}
		if class.invalid_credential {
			conditions.push(ConditionKind::InvalidCredential);
		}
		if self.state.consecutive_error_count == self.settings.max_consecutive_errors {
			conditions.push(ConditionKind::TooManyErrors);
		}
		conditions
	}
}

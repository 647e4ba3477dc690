//! Metrics module for the application.
//!
//! - This module contains the global Prometheus registry.
//! - Defines specific metrics for the poll loop and alert delivery.

pub mod server;

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

use crate::services::controller::ControllerState;

lazy_static! {
	// Global Prometheus registry.
	pub static ref REGISTRY: Registry = Registry::new();

	// Counter of poll cycles by outcome (completed, skipped reason).
	pub static ref POLL_CYCLES_TOTAL: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("poll_cycles_total", "Poll cycles by outcome"),
			&["outcome"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	// Counter of newly detected transactions per chain.
	pub static ref NEW_TRANSACTIONS_TOTAL: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("new_transactions_total", "Newly detected transactions per chain"),
			&["chain"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	// Counter of failed fetches per chain and error kind.
	pub static ref FETCH_FAILURES_TOTAL: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("fetch_failures_total", "Failed adapter fetches per chain and kind"),
			&["chain", "kind"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	// Counter of alert deliveries per sink and result.
	pub static ref ALERTS_TOTAL: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("alerts_total", "Alert deliveries per sink and result"),
			&["sink", "result"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	// Gauge for the current consecutive error count.
	pub static ref CONSECUTIVE_ERRORS: IntGauge = {
		let gauge = IntGauge::new("consecutive_errors", "Current consecutive fetch failures").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	// Gauge set to 1 while a rate-limit cool-down is active.
	pub static ref COOLING_DOWN: IntGauge = {
		let gauge = IntGauge::new("cooling_down", "1 while polling is paused by a rate limit").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	// Gauge for the start time of the last admitted cycle.
	pub static ref LAST_POLL_TIMESTAMP: IntGauge = {
		let gauge = IntGauge::new("last_poll_timestamp_ms", "Start of the last admitted poll cycle").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};
}

/// Gather all metrics and encode into the provided format.
pub fn gather_metrics() -> Result<Vec<u8>, Box<dyn std::error::Error>> {
	let encoder = TextEncoder::new();
	let metric_families = REGISTRY.gather();
	let mut buffer = Vec::new();
	encoder.encode(&metric_families, &mut buffer)?;
	Ok(buffer)
}

/// Mirrors the controller state into the gauges.
pub fn update_controller_metrics(state: &ControllerState) {
	CONSECUTIVE_ERRORS.set(i64::from(state.consecutive_error_count));
	COOLING_DOWN.set(i64::from(state.is_cooling_down));
}

//! A single poll-and-detect cycle across both chains.

use std::{collections::HashMap, sync::Arc};
use tracing::{debug, info, warn};

use crate::{
	models::{ChainKind, TransactionRecord},
	repositories::{KeyValueStore, MonitorStateRepository},
	services::{
		blockchain::ChainAdapter,
		controller::{ConditionKind, ControllerState, RateController},
		notification::TransactionNotifier,
	},
};

use super::error::TxWatcherError;

/// Adapters by chain
#[derive(Clone, Default)]
pub struct AdapterSet {
	adapters: HashMap<ChainKind, Arc<dyn ChainAdapter>>,
}

impl AdapterSet {
	pub fn new(adapters: Vec<Arc<dyn ChainAdapter>>) -> Self {
		Self {
			adapters: adapters
				.into_iter()
				.map(|adapter| (adapter.chain(), adapter))
				.collect(),
		}
	}

	pub fn get(&self, chain: ChainKind) -> Option<&Arc<dyn ChainAdapter>> {
		self.adapters.get(&chain)
	}
}

/// Why a cycle did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
	NothingEnabled,
	CoolingDown,
	Throttled,
}

impl SkipReason {
	pub fn label(&self) -> &'static str {
		match self {
			Self::NothingEnabled => "nothing_enabled",
			Self::CoolingDown => "cooling_down",
			Self::Throttled => "throttled",
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
	pub chain: ChainKind,
	pub record: TransactionRecord,
}

/// A chain that could not be processed in this cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainFailure {
	pub chain: ChainKind,
	/// `network`, `provider_rejected`, `application` or `storage`
	pub kind: &'static str,
	pub message: String,
}

/// What an admitted cycle did
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CycleReport {
	pub started_at_ms: i64,
	pub polled: Vec<ChainKind>,
	pub new_transactions: Vec<NewTransaction>,
	pub failures: Vec<ChainFailure>,
	pub conditions: Vec<ConditionKind>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
	Skipped(SkipReason),
	Completed(CycleReport),
}

impl CycleOutcome {
	pub fn label(&self) -> &'static str {
		match self {
			Self::Skipped(reason) => reason.label(),
			Self::Completed(_) => "completed",
		}
	}
}

/// Everything a cycle needs besides the controller
pub struct CycleContext<'a, S: KeyValueStore> {
	pub repository: &'a MonitorStateRepository<S>,
	pub adapters: &'a AdapterSet,
	pub notifier: &'a dyn TransactionNotifier,
	pub history_limit: usize,
}

/// Prepends `record` to `history` and truncates to `limit`
///
/// Returns `None` when a record with the same hash is already stored.
pub fn prepend_if_new(
	history: &[TransactionRecord],
	record: TransactionRecord,
	limit: usize,
) -> Option<Vec<TransactionRecord>> {
	if history.iter().any(|stored| stored.hash == record.hash) {
		return None;
	}
	let mut updated = Vec::with_capacity(limit.min(history.len() + 1));
	updated.push(record);
	updated.extend(history.iter().cloned());
	updated.truncate(limit);
	Some(updated)
}

/// Runs one poll cycle at `now_ms`
///
/// Only store failures while loading the configuration or stamping the poll time are
/// returned as errors. Fetch failures and per-chain history failures are reported in the
/// outcome and never stop the other chain.
pub async fn poll_cycle<S: KeyValueStore>(
	ctx: &CycleContext<'_, S>,
	controller: &mut RateController,
	now_ms: i64,
) -> Result<CycleOutcome, TxWatcherError> {
	let snapshot = ctx.repository.load_snapshot().await?;

	if !snapshot.config.any_enabled() {
		debug!("no chain enabled, skipping cycle");
		return Ok(CycleOutcome::Skipped(SkipReason::NothingEnabled));
	}
	if !controller.can_poll(now_ms) {
		debug!("cooling down, skipping cycle");
		return Ok(CycleOutcome::Skipped(SkipReason::CoolingDown));
	}
	if !controller.admit_throttle(now_ms, snapshot.last_check_time) {
		debug!("last cycle too recent, skipping");
		return Ok(CycleOutcome::Skipped(SkipReason::Throttled));
	}

	// Stamped before any request so an overlapping trigger is throttled
	ctx.repository.set_last_check_time(now_ms).await?;

	let mut report = CycleReport {
		started_at_ms: now_ms,
		..CycleReport::default()
	};

	for chain in snapshot.config.pollable_chains() {
		let Some(adapter) = ctx.adapters.get(chain) else {
			warn!(chain = %chain, "no adapter registered");
			continue;
		};
		let chain_config = snapshot.config.chain(chain);
		let Some(address) = chain_config.address.as_deref() else {
			continue;
		};

		let history = match ctx.repository.load_history(chain).await {
			Ok(history) => history,
			Err(e) => {
				warn!(chain = %chain, error = %e, "stored history unreadable, skipping chain");
				report.failures.push(ChainFailure {
					chain,
					kind: "storage",
					message: e.to_string(),
				});
				continue;
			}
		};

		report.polled.push(chain);
		let fetched = adapter
			.fetch_latest(address, chain_config.credential.as_deref())
			.await;

		let records = match fetched {
			Ok(records) => records,
			Err(error) => {
				warn!(chain = %chain, error = %error, "fetch failed");
				let conditions = controller.record_failure(&error.to_string(), error.status(), now_ms);
				report.failures.push(ChainFailure {
					chain,
					kind: error.kind(),
					message: error.to_string(),
				});
				for kind in conditions {
					ctx.notifier.notify_condition(kind).await;
					report.conditions.push(kind);
				}
				continue;
			}
		};

		let Some(mut newest) = records.into_iter().next() else {
			debug!(chain = %chain, "no transactions for address");
			controller.record_success();
			continue;
		};
		newest.is_new = true;

		let Some(updated) =
			prepend_if_new(&history, newest.clone(), ctx.history_limit)
		else {
			debug!(chain = %chain, hash = %newest.hash, "no new transaction");
			controller.record_success();
			continue;
		};

		if let Err(e) = ctx.repository.save_history(chain, &updated).await {
			report.failures.push(ChainFailure {
				chain,
				kind: "storage",
				message: e.to_string(),
			});
			controller.record_success();
			continue;
		}

		info!(chain = %chain, hash = %newest.hash, amount = %newest.amount, "new transaction detected");
		ctx.notifier
			.notify_new_transaction(chain, &newest, address)
			.await;
		controller.record_success();
		report.new_transactions.push(NewTransaction {
			chain,
			record: newest,
		});
	}

	Ok(CycleOutcome::Completed(report))
}

/// Controller state after a cycle, for callers that only hold the outcome
pub fn summarize(outcome: &CycleOutcome, state: ControllerState) -> String {
	match outcome {
		CycleOutcome::Skipped(reason) => format!("skipped ({})", reason.label()),
		CycleOutcome::Completed(report) => format!(
			"polled {} chain(s), {} new, {} failed, {} consecutive error(s)",
			report.polled.len(),
			report.new_transactions.len(),
			report.failures.len(),
			state.consecutive_error_count
		),
	}
}

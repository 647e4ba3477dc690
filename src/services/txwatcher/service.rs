//! Scheduled transaction watcher.
//!
//! Runs the poll cycle on a cron schedule. Cycles never overlap: the controller lock is
//! taken with `try_lock`, so a trigger firing while a cycle is in flight is dropped.

use std::{sync::Arc, time::Duration};
use tokio::sync::{watch, Mutex};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::{
	models::{ChainKind, PollingConfig},
	repositories::{KeyValueStore, MonitorStateRepository},
	services::{
		controller::{ControllerSettings, ControllerState, RateController},
		notification::TransactionNotifier,
		txwatcher::{
			cycle::{poll_cycle, summarize, AdapterSet, CycleContext, CycleOutcome},
			error::TxWatcherError,
		},
	},
	utils::metrics::{
		update_controller_metrics, FETCH_FAILURES_TOTAL, LAST_POLL_TIMESTAMP,
		NEW_TRANSACTIONS_TOTAL, POLL_CYCLES_TOTAL,
	},
};

struct WatcherInner<S: KeyValueStore> {
	repository: MonitorStateRepository<S>,
	adapters: AdapterSet,
	notifier: Arc<dyn TransactionNotifier>,
	controller: Arc<Mutex<RateController>>,
	/// Controller state as of the last finished cycle; readers never wait on a cycle
	published_state: watch::Sender<ControllerState>,
	polling: PollingConfig,
}

impl<S: KeyValueStore + 'static> WatcherInner<S> {
	async fn run_cycle(&self) -> Result<Option<CycleOutcome>, TxWatcherError> {
		let Ok(mut controller) = self.controller.try_lock() else {
			debug!("previous cycle still running, skipping trigger");
			POLL_CYCLES_TOTAL.with_label_values(&["in_flight"]).inc();
			return Ok(None);
		};

		let ctx = CycleContext {
			repository: &self.repository,
			adapters: &self.adapters,
			notifier: self.notifier.as_ref(),
			history_limit: self.polling.history_limit,
		};
		let now_ms = chrono::Utc::now().timestamp_millis();
		let result = poll_cycle(&ctx, &mut controller, now_ms).await;
		let state = controller.state();
		drop(controller);
		self.published_state.send_replace(state);
		let outcome = result?;

		POLL_CYCLES_TOTAL
			.with_label_values(&[outcome.label()])
			.inc();
		update_controller_metrics(&state);

		if let CycleOutcome::Completed(report) = &outcome {
			LAST_POLL_TIMESTAMP.set(report.started_at_ms);
			for failure in &report.failures {
				FETCH_FAILURES_TOTAL
					.with_label_values(&[failure.chain.tag(), failure.kind])
					.inc();
			}
			for found in &report.new_transactions {
				NEW_TRANSACTIONS_TOTAL
					.with_label_values(&[found.chain.tag()])
					.inc();
				self.expire_new_flag(found.chain);
			}
			info!("poll cycle finished: {}", summarize(&outcome, state));
		}

		Ok(Some(outcome))
	}

	/// Clears the `isNew` highlight of `chain` once the TTL has passed
	fn expire_new_flag(&self, chain: ChainKind) {
		let repository = self.repository.clone();
		let ttl = Duration::from_millis(self.polling.new_flag_ttl_ms);
		tokio::spawn(async move {
			tokio::time::sleep(ttl).await;
			if let Err(e) = repository.clear_new_flags(chain).await {
				error!(chain = %chain, error = %e, "failed to clear new transaction flags");
			}
		});
	}
}

/// Owns the poll schedule and the controller
pub struct TxWatcherService<S: KeyValueStore + 'static> {
	inner: Arc<WatcherInner<S>>,
	scheduler: Mutex<Option<(JobScheduler, Uuid)>>,
}

impl<S: KeyValueStore + 'static> TxWatcherService<S> {
	/// Creates a new watcher
	///
	/// # Arguments
	/// * `repository` - State repository the cycles read from and write to
	/// * `adapters` - One adapter per supported chain
	/// * `notifier` - Receives new transactions and controller conditions
	/// * `polling` - Schedule, windows and limits
	pub fn new(
		repository: MonitorStateRepository<S>,
		adapters: AdapterSet,
		notifier: Arc<dyn TransactionNotifier>,
		polling: PollingConfig,
	) -> Self {
		let controller = RateController::new(ControllerSettings::from(&polling));
		let (published_state, _) = watch::channel(controller.state());
		Self {
			inner: Arc::new(WatcherInner {
				repository,
				adapters,
				notifier,
				controller: Arc::new(Mutex::new(controller)),
				published_state,
				polling,
			}),
			scheduler: Mutex::new(None),
		}
	}

	/// Shared handle on the controller; holding its lock blocks cycles
	pub fn controller(&self) -> Arc<Mutex<RateController>> {
		self.inner.controller.clone()
	}

	/// Controller state published after every cycle, for status queries
	pub fn controller_state(&self) -> watch::Receiver<ControllerState> {
		self.inner.published_state.subscribe()
	}

	pub fn repository(&self) -> &MonitorStateRepository<S> {
		&self.inner.repository
	}

	/// Runs one cycle now, subject to the same gates as scheduled cycles
	///
	/// Returns `None` when another cycle is in flight.
	pub async fn run_cycle(&self) -> Result<Option<CycleOutcome>, TxWatcherError> {
		self.inner.run_cycle().await
	}

	/// Arms the cron job and starts the scheduler
	pub async fn start(&self) -> Result<(), TxWatcherError> {
		let mut guard = self.scheduler.lock().await;
		if guard.is_some() {
			return Err(TxWatcherError::scheduler_error("Watcher already started"));
		}

		let scheduler = JobScheduler::new().await.map_err(|e| {
			TxWatcherError::scheduler_error(format!("Failed to create scheduler: {}", e))
		})?;

		let inner = self.inner.clone();
		let job = Job::new_async(self.inner.polling.cron_schedule.as_str(), move |_uuid, _l| {
			let inner = inner.clone();
			Box::pin(async move {
				if let Err(e) = inner.run_cycle().await {
					error!("Poll cycle failed: {}", e);
				}
			})
		})
		.map_err(|e| TxWatcherError::scheduler_error(format!("Failed to create job: {}", e)))?;

		let job_id = scheduler
			.add(job)
			.await
			.map_err(|e| TxWatcherError::scheduler_error(format!("Failed to add job: {}", e)))?;

		scheduler.start().await.map_err(|e| {
			TxWatcherError::scheduler_error(format!("Failed to start scheduler: {}", e))
		})?;

		info!(
			schedule = %self.inner.polling.cron_schedule,
			"transaction watcher started"
		);
		*guard = Some((scheduler, job_id));
		Ok(())
	}

	/// Removes the job and shuts the scheduler down; a running cycle completes first
	pub async fn stop(&self) -> Result<(), TxWatcherError> {
		let Some((mut scheduler, job_id)) = self.scheduler.lock().await.take() else {
			return Ok(());
		};

		scheduler.remove(&job_id).await.map_err(|e| {
			TxWatcherError::scheduler_error(format!("Failed to remove job: {}", e))
		})?;
		scheduler.shutdown().await.map_err(|e| {
			TxWatcherError::scheduler_error(format!("Failed to stop scheduler: {}", e))
		})?;

		// Wait for an in-flight cycle
		let _controller = self.inner.controller.lock().await;
		info!("transaction watcher stopped");
		Ok(())
	}

	pub async fn is_running(&self) -> bool {
		self.scheduler.lock().await.is_some()
	}
}

//! Transaction watcher service.
//!
//! Schedules poll cycles, detects new transactions against the stored history and hands
//! them to the notifier, feeding fetch failures into the rate controller.

mod cycle;
mod error;
mod service;

pub use cycle::{
	poll_cycle, prepend_if_new, summarize, AdapterSet, ChainFailure, CycleContext,
	CycleOutcome, CycleReport, NewTransaction, SkipReason,
};
pub use error::TxWatcherError;
pub use service::TxWatcherService;

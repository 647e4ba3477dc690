use async_trait::async_trait;
use std::{
	collections::VecDeque,
	sync::{
		atomic::{AtomicUsize, Ordering},
		Mutex,
	},
};

use dual_chain_notifier::{
	models::{ChainKind, TransactionRecord},
	services::blockchain::{ChainAdapter, FetchError},
	utils::tests::builders::transaction::TransactionRecordBuilder,
};

/// Adapter answering from a scripted queue; an exhausted queue yields an empty list
pub struct ScriptedAdapter {
	chain: ChainKind,
	responses: Mutex<VecDeque<Result<Vec<TransactionRecord>, FetchError>>>,
	calls: AtomicUsize,
}

impl ScriptedAdapter {
	pub fn new(
		chain: ChainKind,
		responses: Vec<Result<Vec<TransactionRecord>, FetchError>>,
	) -> Self {
		Self {
			chain,
			responses: Mutex::new(responses.into()),
			calls: AtomicUsize::new(0),
		}
	}

	/// Adapter that returns the same newest transaction on every call
	pub fn repeating(chain: ChainKind, hash: &str, calls: usize) -> Self {
		Self::new(chain, (0..calls).map(|_| Ok(vec![record(hash)])).collect())
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl ChainAdapter for ScriptedAdapter {
	fn chain(&self) -> ChainKind {
		self.chain
	}

	async fn fetch_latest(
		&self,
		_address: &str,
		_credential: Option<&str>,
	) -> Result<Vec<TransactionRecord>, FetchError> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		self.responses
			.lock()
			.unwrap()
			.pop_front()
			.unwrap_or_else(|| Ok(Vec::new()))
	}
}

pub fn record(hash: &str) -> TransactionRecord {
	TransactionRecordBuilder::new().hash(hash).build()
}

//! Test helper utilities for transaction records
//!
//! - `TransactionRecordBuilder`: Builder for creating test TransactionRecord instances

use crate::models::{Direction, TransactionRecord};

/// Builder for creating test TransactionRecord instances
pub struct TransactionRecordBuilder {
	record: TransactionRecord,
}

impl Default for TransactionRecordBuilder {
	fn default() -> Self {
		Self {
			record: TransactionRecord {
				hash: "0xAA".to_string(),
				amount: "1.000000 ETH".to_string(),
				direction: Direction::Incoming,
				timestamp: 1_700_000_000_000,
				is_new: false,
				from: None,
				to: None,
				gas_price: None,
				gas_used: None,
				block_height: None,
				fee: None,
			},
		}
	}
}

impl TransactionRecordBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn hash(mut self, hash: &str) -> Self {
		self.record.hash = hash.to_string();
		self
	}

	pub fn amount(mut self, amount: &str) -> Self {
		self.record.amount = amount.to_string();
		self
	}

	pub fn direction(mut self, direction: Direction) -> Self {
		self.record.direction = direction;
		self
	}

	pub fn timestamp(mut self, timestamp: i64) -> Self {
		self.record.timestamp = timestamp;
		self
	}

	pub fn is_new(mut self, is_new: bool) -> Self {
		self.record.is_new = is_new;
		self
	}

	pub fn block_height(mut self, height: u64) -> Self {
		self.record.block_height = Some(height);
		self
	}

	pub fn build(self) -> TransactionRecord {
		self.record
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_builder_overrides_defaults() {
		let record = TransactionRecordBuilder::new()
			.hash("0xBB")
			.direction(Direction::Outgoing)
			.is_new(true)
			.build();
		assert_eq!(record.hash, "0xBB");
		assert_eq!(record.direction, Direction::Outgoing);
		assert!(record.is_new);
		assert_eq!(record.amount, "1.000000 ETH");
	}
}

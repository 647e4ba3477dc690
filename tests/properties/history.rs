use dual_chain_notifier::services::txwatcher::prepend_if_new;
use proptest::{prelude::*, test_runner::Config};
use std::collections::HashSet;

use crate::properties::strategies::{history_strategy, transaction_record_strategy};

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn prepended_history_is_bounded_and_starts_with_record(
		history in history_strategy(),
		record in transaction_record_strategy(),
		limit in 1usize..12,
	) {
		let known = history.iter().any(|stored| stored.hash == record.hash);
		match prepend_if_new(&history, record.clone(), limit) {
			Some(updated) => {
				prop_assert!(!known);
				prop_assert!(updated.len() <= limit);
				prop_assert_eq!(updated.len(), (history.len() + 1).min(limit));
				prop_assert_eq!(&updated[0], &record);
				prop_assert_eq!(&updated[1..], &history[..updated.len() - 1]);
			}
			None => prop_assert!(known),
		}
	}

	#[test]
	fn hashes_stay_unique_across_repeated_prepends(
		records in prop::collection::vec(transaction_record_strategy(), 1..30),
	) {
		let mut history = Vec::new();
		for record in records {
			if let Some(updated) = prepend_if_new(&history, record, 10) {
				history = updated;
			}
		}
		let hashes: HashSet<_> = history.iter().map(|record| record.hash.as_str()).collect();
		prop_assert_eq!(hashes.len(), history.len());
		prop_assert!(history.len() <= 10);
	}

	#[test]
	fn prepending_a_stored_record_changes_nothing(
		history in history_strategy().prop_filter("non-empty", |h| !h.is_empty()),
		index in any::<prop::sample::Index>(),
	) {
		let existing = history[index.index(history.len())].clone();
		prop_assert!(prepend_if_new(&history, existing, 10).is_none());
	}
}

use dual_chain_notifier::services::controller::{
	classify_failure, ConditionKind, ControllerSettings, RateController,
};
use proptest::{prelude::*, test_runner::Config};

use crate::properties::strategies::generic_failure_strategy;

const NOW: i64 = 1_700_000_000_000;

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn too_many_errors_fires_exactly_once_per_streak(
		failures in prop::collection::vec(generic_failure_strategy(), 1..12),
		threshold in 1u32..6,
	) {
		let mut controller = RateController::new(ControllerSettings {
			max_consecutive_errors: threshold,
			..ControllerSettings::default()
		});

		let mut alerts = 0;
		for (i, message) in failures.iter().enumerate() {
			let conditions = controller.record_failure(message, None, NOW + i as i64);
			alerts += conditions
				.iter()
				.filter(|kind| **kind == ConditionKind::TooManyErrors)
				.count();
			prop_assert!(!conditions.contains(&ConditionKind::RateLimited));
		}

		prop_assert_eq!(controller.state().consecutive_error_count as usize, failures.len());
		prop_assert_eq!(alerts, usize::from(failures.len() >= threshold as usize));
		prop_assert!(!controller.state().is_cooling_down);

		controller.record_success();
		prop_assert_eq!(controller.state().consecutive_error_count, 0);
	}

	#[test]
	fn cool_down_blocks_until_the_window_ends(
		delay in 1_000i64..300_000,
		offset in 0i64..600_000,
	) {
		let mut controller = RateController::new(ControllerSettings {
			rate_limit_delay_ms: delay,
			..ControllerSettings::default()
		});
		let conditions = controller.record_failure("Max rate limit reached", None, NOW);
		prop_assert_eq!(conditions, vec![ConditionKind::RateLimited]);
		prop_assert_eq!(controller.state().cool_down_until_ms, NOW + delay);

		let admitted = controller.can_poll(NOW + offset);
		prop_assert_eq!(admitted, offset >= delay);
		if admitted {
			prop_assert!(!controller.state().is_cooling_down);
			prop_assert_eq!(controller.state().consecutive_error_count, 0);
		}
	}

	#[test]
	fn generic_messages_never_classify_as_special(
		message in generic_failure_strategy(),
		status in prop::option::of(prop_oneof![400u16..429, 430u16..600]),
	) {
		let class = classify_failure(message, status);
		prop_assert!(class.is_generic());
	}

	#[test]
	fn rate_limit_phrase_is_matched_in_any_case(
		prefix in "[a-zA-Z ]{0,10}",
		upper in any::<bool>(),
	) {
		let phrase = if upper { "RATE LIMIT" } else { "rate limit" };
		let class = classify_failure(&format!("{}{} reached", prefix, phrase), None);
		prop_assert!(class.rate_limited);
	}
}

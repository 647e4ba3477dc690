use dual_chain_notifier::services::blockchain::{format_sats, format_wei};
use proptest::{prelude::*, test_runner::Config};
use rust_decimal::Decimal;
use std::str::FromStr;

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn wei_amounts_render_with_six_decimals(wei in any::<u64>()) {
		let formatted = format_wei(Some(&wei.to_string()));
		let number = formatted.strip_suffix(" ETH").unwrap();
		let (_, decimals) = number.split_once('.').unwrap();
		prop_assert_eq!(decimals.len(), 6);

		// Never more than half a display unit away from the exact value
		let exact = Decimal::from_i128_with_scale(wei as i128, 18);
		let shown = Decimal::from_str(number).unwrap();
		prop_assert!((exact - shown).abs() <= Decimal::new(5, 7));
	}

	#[test]
	fn non_numeric_wei_is_not_available(value in "[a-zA-Z]{1,12}") {
		prop_assert_eq!(format_wei(Some(&value)), "N/A");
	}

	#[test]
	fn satoshi_amounts_are_exact(sats in 0u64..2_100_000_000_000_000) {
		let formatted = format_sats(sats);
		let number = formatted.strip_suffix(" BTC").unwrap();
		let shown = Decimal::from_str(number).unwrap();
		prop_assert_eq!(shown, Decimal::from_i128_with_scale(sats as i128, 8));
		prop_assert_eq!(number.split_once('.').unwrap().1.len(), 8);
	}
}

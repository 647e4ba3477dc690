use serde::{Deserialize, Serialize};
use std::fmt;

/// The chains a monitor can watch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainKind {
	#[serde(rename = "eth")]
	Ethereum,
	#[serde(rename = "btc")]
	Bitcoin,
}

impl ChainKind {
	/// Every supported chain, in polling order
	pub const ALL: [ChainKind; 2] = [ChainKind::Ethereum, ChainKind::Bitcoin];

	/// Short tag used in store field names, alert keys and events
	pub fn tag(&self) -> &'static str {
		match self {
			Self::Ethereum => "eth",
			Self::Bitcoin => "btc",
		}
	}

	pub fn display_name(&self) -> &'static str {
		match self {
			Self::Ethereum => "Ethereum",
			Self::Bitcoin => "Bitcoin",
		}
	}

	/// Whether the provider for this chain needs an API credential
	pub fn requires_credential(&self) -> bool {
		matches!(self, Self::Ethereum)
	}

	/// Parses a chain tag such as `eth` or `btc`
	pub fn from_tag(tag: &str) -> Option<Self> {
		match tag.to_ascii_lowercase().as_str() {
			"eth" | "ethereum" => Some(Self::Ethereum),
			"btc" | "bitcoin" => Some(Self::Bitcoin),
			_ => None,
		}
	}
}

impl fmt::Display for ChainKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.tag())
	}
}

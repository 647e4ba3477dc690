//! Chain specific adapter implementations.

mod bitcoin;
mod ethereum;

pub use bitcoin::{format_sats, BitcoinAdapter};
pub use ethereum::{format_wei, EthereumAdapter};

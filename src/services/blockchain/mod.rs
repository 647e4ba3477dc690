//! Chain adapters for the supported explorer APIs.
//!
//! - Generic adapter trait
//! - Ethereum (Etherscan-compatible) and Bitcoin (Esplora-compatible) adapters
//! - Error type for failed fetches

mod client;
mod clients;
mod error;

pub use client::ChainAdapter;
pub use clients::{format_sats, format_wei, BitcoinAdapter, EthereumAdapter};
pub use error::FetchError;

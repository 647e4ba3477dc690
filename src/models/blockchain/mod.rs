//! Provider response types for the supported chains.

pub mod bitcoin;
pub mod ethereum;

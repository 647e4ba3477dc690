//! Core services of the transaction notifier.
//!
//! - `blockchain`: chain adapters for the explorer APIs
//! - `controller`: rate-limit and error backoff
//! - `notification`: alert construction and delivery
//! - `status`: read-only status queries
//! - `txwatcher`: scheduled poll cycles

pub mod blockchain;
pub mod controller;
pub mod notification;
pub mod status;
pub mod txwatcher;

//! Dual-chain transaction notifier.
//!
//! Polls an Etherscan-compatible and an Esplora-compatible explorer for one address per
//! chain, detects new transactions against a bounded history and raises alerts.
//!
//! # Architecture
//! - Repositories: persistent key-value state (configuration, histories, poll time)
//! - Services: chain adapters, rate controller, notifier, status query, poll scheduler
//! - Models: transactions, monitor configuration and application configuration
//! - Utils: logging, HTTP clients, metrics and the status server

pub mod bootstrap;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;

//! Persistent state repositories.
//!
//! - `store`: namespaced key-value store with change notifications
//! - `monitor_state`: typed view of the monitoring fields kept in the store

mod error;
mod monitor_state;
mod store;

pub use error::RepositoryError;
pub use monitor_state::{fields, history_field, MonitorStateRepository, StateSnapshot};
pub use store::{JsonFileStore, KeyValueStore, StoreChange};

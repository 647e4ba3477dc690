//! Namespaced key-value store.
//!
//! The store keeps a flat JSON object per namespace. Every write that changes a field is
//! broadcast to subscribers as a [`StoreChange`], which is how observers such as an open
//! operator panel learn about new history entries or configuration edits.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::{
	collections::HashMap,
	path::{Path, PathBuf},
};
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

use crate::{repositories::error::RepositoryError, utils::constants::EVENT_CHANNEL_CAPACITY};

/// A single field change, emitted after the write is durable
#[derive(Debug, Clone, PartialEq)]
pub struct StoreChange {
	pub namespace: String,
	pub field: String,
	pub old_value: Option<Value>,
	pub new_value: Option<Value>,
}

/// Interface for namespaced key-value storage
#[async_trait]
pub trait KeyValueStore: Send + Sync {
	/// Reads the requested fields; absent fields are omitted from the result
	async fn get(&self, fields: &[&str]) -> Result<HashMap<String, Value>, RepositoryError>;

	/// Writes all given fields in one step
	async fn set(&self, values: HashMap<String, Value>) -> Result<(), RepositoryError>;

	/// Subscribes to change notifications
	fn subscribe(&self) -> broadcast::Receiver<StoreChange>;
}

/// Key-value store persisted as `<dir>/<namespace>.json`
///
/// Created with [`JsonFileStore::in_memory`] it keeps values for the process lifetime only.
pub struct JsonFileStore {
	namespace: String,
	file_path: Option<PathBuf>,
	data: Mutex<Map<String, Value>>,
	changes: broadcast::Sender<StoreChange>,
}

impl JsonFileStore {
	/// Opens the namespace file under `dir`, creating the directory if needed
	pub async fn open(dir: &Path, namespace: &str) -> Result<Self, RepositoryError> {
		tokio::fs::create_dir_all(dir).await.map_err(|e| {
			RepositoryError::load_error(format!(
				"Failed to create storage directory {}: {}",
				dir.display(),
				e
			))
		})?;

		let file_path = dir.join(format!("{}.json", namespace));
		let data = read_map(&file_path).await?;

		let (changes, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
		Ok(Self {
			namespace: namespace.to_string(),
			file_path: Some(file_path),
			data: Mutex::new(data),
			changes,
		})
	}

	pub fn in_memory(namespace: &str) -> Self {
		let (changes, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
		Self {
			namespace: namespace.to_string(),
			file_path: None,
			data: Mutex::new(Map::new()),
			changes,
		}
	}

	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	/// Refreshes the cached map from disk so writes made by other processes are seen
	async fn reload(&self, data: &mut Map<String, Value>) -> Result<(), RepositoryError> {
		if let Some(file_path) = &self.file_path {
			*data = read_map(file_path).await?;
		}
		Ok(())
	}

	async fn persist(&self, data: &Map<String, Value>) -> Result<(), RepositoryError> {
		let Some(file_path) = &self.file_path else {
			return Ok(());
		};

		let content = serde_json::to_string_pretty(data)?;
		let tmp_path = file_path.with_extension("json.tmp");
		tokio::fs::write(&tmp_path, content).await.map_err(|e| {
			RepositoryError::write_error(format!("Failed to write {}: {}", tmp_path.display(), e))
		})?;
		tokio::fs::rename(&tmp_path, file_path).await.map_err(|e| {
			RepositoryError::write_error(format!(
				"Failed to replace {}: {}",
				file_path.display(),
				e
			))
		})?;
		Ok(())
	}
}

/// Reads a namespace file; a missing or blank file is an empty namespace
async fn read_map(file_path: &Path) -> Result<Map<String, Value>, RepositoryError> {
	if !tokio::fs::try_exists(file_path).await.unwrap_or(false) {
		return Ok(Map::new());
	}

	let content = tokio::fs::read_to_string(file_path).await.map_err(|e| {
		RepositoryError::load_error(format!("Failed to read {}: {}", file_path.display(), e))
	})?;
	if content.trim().is_empty() {
		return Ok(Map::new());
	}

	match serde_json::from_str::<Value>(&content)? {
		Value::Object(map) => Ok(map),
		_ => Err(RepositoryError::parse_error(format!(
			"{} does not contain a JSON object",
			file_path.display()
		))),
	}
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
	async fn get(&self, fields: &[&str]) -> Result<HashMap<String, Value>, RepositoryError> {
		let mut data = self.data.lock().await;
		self.reload(&mut data).await?;
		Ok(fields
			.iter()
			.filter_map(|field| {
				data.get(*field)
					.map(|value| (field.to_string(), value.clone()))
			})
			.collect())
	}

	async fn set(&self, values: HashMap<String, Value>) -> Result<(), RepositoryError> {
		let mut data = self.data.lock().await;
		// Other processes may have written since the last access; only the given fields change
		self.reload(&mut data).await?;

		let mut updated = data.clone();
		let mut changes = Vec::new();
		for (field, new_value) in values {
			let old_value = updated.insert(field.clone(), new_value.clone());
			if old_value.as_ref() != Some(&new_value) {
				changes.push(StoreChange {
					namespace: self.namespace.clone(),
					field,
					old_value,
					new_value: Some(new_value),
				});
			}
		}

		if changes.is_empty() {
			return Ok(());
		}

		self.persist(&updated).await?;
		*data = updated;
		drop(data);

		for change in changes {
			debug!(field = %change.field, "store field changed");
			// No subscribers is fine
			let _ = self.changes.send(change);
		}
		Ok(())
	}

	fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
		self.changes.subscribe()
	}
}

//! JSON-file backed [`KeyValueStore`].
//!
//! The whole store is one JSON object (`{"example.com": [...], "language": "hi"}`),
//! the same shape the extension keeps in `chrome.storage.local`. Writes go to a
//! sibling temp file that is then renamed over the original.

use async_trait::async_trait;
use nayan_common::error::StoreError;
use nayan_common::storage::{StorageChange, StoredValue};
use nayan_core::store::{self, KeyValueStore};
use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, info};

const CHANGE_CHANNEL_CAPACITY: usize = 64;

type Values = BTreeMap<String, StoredValue>;

/// Clones share the file lock and the change channel.
#[derive(Clone)]
pub struct FileStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
    changes: broadcast::Sender<StorageChange>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
            changes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Values, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Values::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Values::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    async fn write(&self, values: &Values) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(values)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!("Wrote {} keys to {}", values.len(), self.path.display());
        Ok(())
    }

    fn publish(&self, changes: Vec<StorageChange>) {
        for c in changes {
            let _ = self.changes.send(c);
        }
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, StoredValue>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut values = self.read().await?;
        Ok(keys
            .iter()
            .filter_map(|k| values.remove(*k).map(|v| (k.to_string(), v)))
            .collect())
    }

    async fn set(&self, key: &str, value: StoredValue) -> Result<(), StoreError> {
        let old = {
            let _guard = self.lock.lock().await;
            let mut values = self.read().await?;
            let old = values.insert(key.to_string(), value.clone());
            self.write(&values).await?;
            old
        };
        self.publish(vec![store::change(key, old, Some(value))]);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let old = {
            let _guard = self.lock.lock().await;
            let mut values = self.read().await?;
            let old = values.remove(key);
            if old.is_some() {
                self.write(&values).await?;
            }
            old
        };
        if old.is_some() {
            self.publish(vec![store::change(key, old, None)]);
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let removed = {
            let _guard = self.lock.lock().await;
            let removed = self.read().await?;
            if removed.is_empty() {
                return Ok(());
            }
            self.write(&Values::new()).await?;
            removed
        };
        info!("Cleared {} stored keys from {}", removed.len(), self.path.display());
        self.publish(
            removed
                .into_iter()
                .map(|(k, v)| store::change(&k, Some(v), None))
                .collect(),
        );
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.into_keys().collect())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }
}

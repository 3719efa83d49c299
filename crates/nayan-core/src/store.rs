//! Persistence collaborator.
//!
//! Tables live in a key-value store keyed by domain, next to the language
//! preference. Every write is broadcast to subscribers as a [`StorageChange`]
//! so page sessions can keep their cached table current.

use crate::locale::Language;
use nayan_common::binding::ShortcutTable;
use nayan_common::error::StoreError;
use nayan_common::storage::{LANGUAGE_KEY, StorageChange, StoredValue};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast;
use tracing::info;

const CHANGE_CHANNEL_CAPACITY: usize = 64;

#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
pub trait KeyValueStore {
    /// Values for the requested keys; absent keys are omitted.
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, StoredValue>, StoreError>;

    async fn set(&self, key: &str, value: StoredValue) -> Result<(), StoreError>;

    async fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Remove every key.
    async fn clear(&self) -> Result<(), StoreError>;

    async fn keys(&self) -> Result<Vec<String>, StoreError>;

    /// Receive a [`StorageChange`] for every key changed after this call.
    fn subscribe(&self) -> broadcast::Receiver<StorageChange>;

    /// False once the host connection is gone for good.
    fn is_available(&self) -> bool {
        true
    }
}

/// Read the table of `domain`, empty if none is stored.
pub async fn load_table<S: KeyValueStore + ?Sized>(
    store: &S,
    domain: &str,
) -> Result<ShortcutTable, StoreError> {
    let mut values = store.get(&[domain]).await?;
    match values.remove(domain) {
        None => Ok(ShortcutTable::new()),
        Some(StoredValue::Bindings(table)) => Ok(table),
        Some(StoredValue::Language(_)) => Err(StoreError::UnexpectedValue {
            key: domain.to_string(),
            expected: "a list of shortcuts",
        }),
    }
}

pub async fn save_table<S: KeyValueStore + ?Sized>(
    store: &S,
    domain: &str,
    table: &ShortcutTable,
) -> Result<(), StoreError> {
    store
        .set(domain, StoredValue::Bindings(table.clone()))
        .await
}

/// The stored language preference, if any.
pub async fn load_language<S: KeyValueStore + ?Sized>(
    store: &S,
) -> Result<Option<Language>, StoreError> {
    let values = store.get(&[LANGUAGE_KEY]).await?;
    Ok(values
        .get(LANGUAGE_KEY)
        .and_then(StoredValue::as_language)
        .map(Language::resolve))
}

pub async fn save_language<S: KeyValueStore + ?Sized>(
    store: &S,
    language: Language,
) -> Result<(), StoreError> {
    store
        .set(LANGUAGE_KEY, StoredValue::Language(language.code().to_string()))
        .await
}

/// Change record for replacing `old` with `new` under `key`.
pub fn change(key: &str, old: Option<StoredValue>, new: Option<StoredValue>) -> StorageChange {
    StorageChange {
        key: key.to_string(),
        old_value: old,
        new_value: new,
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    values: BTreeMap<String, StoredValue>,
    invalidated: bool,
}

/// Process-local store. Clones share the same data and change channel.
#[derive(Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    changes: broadcast::Sender<StorageChange>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            changes,
        }
    }

    /// Make every later call fail with [`StoreError::ContextInvalidated`],
    /// as after the extension is reloaded under a running page.
    pub fn invalidate(&self) {
        self.lock().invalidated = true;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn live(&self) -> Result<std::sync::MutexGuard<'_, MemoryState>, StoreError> {
        let guard = self.lock();
        if guard.invalidated {
            return Err(StoreError::ContextInvalidated);
        }
        Ok(guard)
    }

    fn publish(&self, changes: Vec<StorageChange>) {
        for c in changes {
            // No subscribers is fine.
            let _ = self.changes.send(c);
        }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
impl KeyValueStore for MemoryStore {
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, StoredValue>, StoreError> {
        let state = self.live()?;
        Ok(keys
            .iter()
            .filter_map(|k| state.values.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }

    async fn set(&self, key: &str, value: StoredValue) -> Result<(), StoreError> {
        let old = {
            let mut state = self.live()?;
            state.values.insert(key.to_string(), value.clone())
        };
        self.publish(vec![change(key, old, Some(value))]);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let old = self.live()?.values.remove(key);
        if old.is_some() {
            self.publish(vec![change(key, old, None)]);
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let removed = std::mem::take(&mut self.live()?.values);
        if removed.is_empty() {
            return Ok(());
        }
        info!("Cleared {} stored keys", removed.len());
        self.publish(
            removed
                .into_iter()
                .map(|(k, v)| change(&k, Some(v), None))
                .collect(),
        );
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.live()?.values.keys().cloned().collect())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }

    fn is_available(&self) -> bool {
        !self.lock().invalidated
    }
}

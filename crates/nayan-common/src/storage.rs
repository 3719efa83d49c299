use crate::binding::ShortcutTable;
use serde::{Deserialize, Serialize};

/// Store key holding the preferred feedback language.
pub const LANGUAGE_KEY: &str = "language";

/// A value held under one store key.
///
/// Domain keys hold a shortcut table, [`LANGUAGE_KEY`] holds a language code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Language(String),
    Bindings(ShortcutTable),
}

impl StoredValue {
    pub fn as_table(&self) -> Option<&ShortcutTable> {
        match self {
            StoredValue::Bindings(table) => Some(table),
            StoredValue::Language(_) => None,
        }
    }

    pub fn into_table(self) -> Option<ShortcutTable> {
        match self {
            StoredValue::Bindings(table) => Some(table),
            StoredValue::Language(_) => None,
        }
    }

    pub fn as_language(&self) -> Option<&str> {
        match self {
            StoredValue::Language(code) => Some(code),
            StoredValue::Bindings(_) => None,
        }
    }
}

impl From<ShortcutTable> for StoredValue {
    fn from(table: ShortcutTable) -> Self {
        StoredValue::Bindings(table)
    }
}

/// Notification delivered to store subscribers for every changed key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageChange {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<StoredValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<StoredValue>,
}

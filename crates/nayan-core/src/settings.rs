//! Settings surface: the manual-edit operations behind the popup grid and the
//! command line. Writes go through the same store the page cores read, so
//! open pages pick them up through change notifications.

use crate::combo::{ComboError, ComboToken};
use crate::domain;
use crate::locale::Language;
use crate::store::{self, KeyValueStore};
use nayan_common::binding::{ShortcutBinding, ShortcutTable, TableError, Upsert};
use nayan_common::error::StoreError;
use nayan_common::storage::LANGUAGE_KEY;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("Invalid key combination: {0}")]
    Combo(#[from] ComboError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),
    #[error("Not a valid domain: {0:?}")]
    InvalidDomain(String),
}

pub struct Settings<S> {
    store: S,
}

impl<S: KeyValueStore> Settings<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn list(&self, domain: &str) -> Result<ShortcutTable, SettingsError> {
        let domain = resolve_domain(domain)?;
        Ok(store::load_table(&self.store, &domain).await?)
    }

    /// Bind `combo` (typed form, e.g. `shift+s`) to `selector` on `domain`.
    pub async fn bind(
        &self,
        domain: &str,
        selector: &str,
        combo: &str,
    ) -> Result<(ComboToken, Upsert), SettingsError> {
        let domain = resolve_domain(domain)?;
        if selector.trim().is_empty() {
            return Err(TableError::MissingIdentifier.into());
        }
        let combo = ComboToken::parse(combo)?;
        let mut table = store::load_table(&self.store, &domain).await?;
        let upsert = table.upsert(selector, combo.clone())?;
        if upsert != Upsert::Unchanged {
            store::save_table(&self.store, &domain, &table).await?;
        }
        info!("{}: {} -> {}", domain, combo, selector.trim());
        Ok((combo, upsert))
    }

    /// Delete the binding whose selector or combo is `target`.
    pub async fn unbind(&self, domain: &str, target: &str) -> Result<ShortcutBinding, SettingsError> {
        let domain = resolve_domain(domain)?;
        let mut table = store::load_table(&self.store, &domain).await?;
        let removed = table.remove(target)?;
        if table.is_empty() {
            self.store.remove(&domain).await?;
        } else {
            store::save_table(&self.store, &domain, &table).await?;
        }
        info!("{}: removed {} ({})", domain, removed.selector, removed.combo);
        Ok(removed)
    }

    /// Domains that have a table.
    pub async fn domains(&self) -> Result<Vec<String>, SettingsError> {
        let mut keys = self.store.keys().await?;
        keys.retain(|k| k != LANGUAGE_KEY);
        Ok(keys)
    }

    /// Delete every table and preference.
    pub async fn reset(&self) -> Result<(), SettingsError> {
        Ok(self.store.clear().await?)
    }

    pub async fn language(&self) -> Result<Option<Language>, SettingsError> {
        Ok(store::load_language(&self.store).await?)
    }

    pub async fn set_language(&self, code: &str) -> Result<Language, SettingsError> {
        let language =
            Language::from_code(code).ok_or_else(|| SettingsError::UnknownLanguage(code.to_string()))?;
        store::save_language(&self.store, language).await?;
        Ok(language)
    }
}

fn resolve_domain(input: &str) -> Result<String, SettingsError> {
    domain::normalize_domain(input).ok_or_else(|| SettingsError::InvalidDomain(input.to_string()))
}

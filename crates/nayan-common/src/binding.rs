use crate::combo::ComboToken;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// One selector bound to one key combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutBinding {
    /// Older tables stored the selector under `id`.
    #[serde(alias = "id")]
    pub selector: String,
    /// Older tables stored the combo under `key`.
    #[serde(alias = "key")]
    pub combo: ComboToken,
}

impl ShortcutBinding {
    pub fn new(selector: impl Into<String>, combo: ComboToken) -> Self {
        Self {
            selector: selector.into(),
            combo,
        }
    }

    fn is_blank(&self) -> bool {
        self.selector.trim().is_empty() || self.combo.is_blank()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("Missing element selector")]
    MissingIdentifier,
    #[error("{combo} is already bound to {selector}")]
    Conflict { combo: ComboToken, selector: String },
    #[error("No shortcut matches {0}")]
    NotFound(String),
}

/// What an upsert did to the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upsert {
    Appended,
    Updated { previous: ComboToken },
    Unchanged,
}

/// Ordered bindings of one domain. Combos are unique within a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ShortcutTable {
    bindings: Vec<ShortcutBinding>,
}

impl ShortcutTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from raw stored rows.
    ///
    /// Blank rows are dropped. When two rows share a combo or a selector the
    /// first one wins.
    pub fn from_bindings(rows: impl IntoIterator<Item = ShortcutBinding>) -> Self {
        let mut table = Self::new();
        for mut row in rows {
            if row.is_blank() {
                continue;
            }
            row.selector = row.selector.trim().to_string();
            if table.find_by_combo(&row.combo).is_some()
                || table.find_by_selector(&row.selector).is_some()
            {
                continue;
            }
            table.bindings.push(row);
        }
        table
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShortcutBinding> {
        self.bindings.iter()
    }

    pub fn bindings(&self) -> &[ShortcutBinding] {
        &self.bindings
    }

    pub fn find_by_combo(&self, combo: &ComboToken) -> Option<&ShortcutBinding> {
        self.bindings.iter().find(|b| &b.combo == combo)
    }

    pub fn find_by_selector(&self, selector: &str) -> Option<&ShortcutBinding> {
        let selector = selector.trim();
        self.bindings.iter().find(|b| b.selector == selector)
    }

    /// The binding that already owns `combo` for a selector other than `selector`.
    pub fn conflict_for(&self, selector: &str, combo: &ComboToken) -> Option<&ShortcutBinding> {
        let selector = selector.trim();
        self.bindings
            .iter()
            .find(|b| &b.combo == combo && b.selector != selector)
    }

    /// Bind `combo` to `selector`, updating the selector's existing row in place.
    ///
    /// The conflict check runs before any mutation, so a rejected call leaves
    /// the table untouched.
    pub fn upsert(&mut self, selector: &str, combo: ComboToken) -> Result<Upsert, TableError> {
        let selector = selector.trim();
        if selector.is_empty() {
            return Err(TableError::MissingIdentifier);
        }
        if let Some(existing) = self.conflict_for(selector, &combo) {
            return Err(TableError::Conflict {
                combo,
                selector: existing.selector.clone(),
            });
        }

        match self.bindings.iter_mut().find(|b| b.selector == selector) {
            Some(existing) if existing.combo == combo => Ok(Upsert::Unchanged),
            Some(existing) => {
                let previous = std::mem::replace(&mut existing.combo, combo);
                Ok(Upsert::Updated { previous })
            }
            None => {
                self.bindings.push(ShortcutBinding::new(selector, combo));
                Ok(Upsert::Appended)
            }
        }
    }

    pub fn remove_selector(&mut self, selector: &str) -> Option<ShortcutBinding> {
        let selector = selector.trim();
        let pos = self.bindings.iter().position(|b| b.selector == selector)?;
        Some(self.bindings.remove(pos))
    }

    pub fn remove_combo(&mut self, combo: &ComboToken) -> Option<ShortcutBinding> {
        let pos = self.bindings.iter().position(|b| &b.combo == combo)?;
        Some(self.bindings.remove(pos))
    }

    /// Remove by selector, falling back to treating `target` as a combo.
    pub fn remove(&mut self, target: &str) -> Result<ShortcutBinding, TableError> {
        if let Some(removed) = self.remove_selector(target) {
            return Ok(removed);
        }
        ComboToken::parse(target)
            .ok()
            .and_then(|combo| self.remove_combo(&combo))
            .ok_or_else(|| TableError::NotFound(target.to_string()))
    }
}

impl<'de> Deserialize<'de> for ShortcutTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows = Vec::<ShortcutBinding>::deserialize(deserializer)?;
        Ok(Self::from_bindings(rows))
    }
}

impl<'a> IntoIterator for &'a ShortcutTable {
    type Item = &'a ShortcutBinding;
    type IntoIter = std::slice::Iter<'a, ShortcutBinding>;

    fn into_iter(self) -> Self::IntoIter {
        self.bindings.iter()
    }
}

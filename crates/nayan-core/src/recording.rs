//! Recording flow: capture the next valid keystroke for a picked element.

use crate::combo::{self, ComboToken, is_modifier_key};
use crate::config::RecordingConfig;
use crate::event::KeyEvent;
use crate::page::ElementId;
use crate::store::{self, KeyValueStore};
use nayan_common::binding::{ShortcutTable, TableError, Upsert};
use nayan_common::error::StoreError;
use tracing::{debug, info};

/// How the recorder treats one keydown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyVerdict {
    /// Bare modifier: keep waiting.
    Ignore,
    /// Abandon recording.
    Cancel,
    /// Not allowed as a shortcut; the user must retry.
    Invalid,
    Combo(ComboToken),
}

/// Result of committing a combo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Saved {
        combo: ComboToken,
        upsert: Upsert,
        table: ShortcutTable,
    },
    /// The combo already belongs to another selector on this domain.
    Conflict { combo: ComboToken, selector: String },
    MissingIdentifier,
}

/// Pending recording for one picked element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    pub selector: String,
    /// Element that receives visual feedback, if still around.
    pub feedback_target: Option<ElementId>,
}

impl Recording {
    pub fn new(selector: impl Into<String>, feedback_target: Option<ElementId>) -> Self {
        Self {
            selector: selector.into(),
            feedback_target,
        }
    }

    /// Classify a keydown received while recording.
    pub fn classify(event: &KeyEvent, config: &RecordingConfig) -> KeyVerdict {
        if is_modifier_key(&event.key) {
            return KeyVerdict::Ignore;
        }
        if config.cancel_on_escape && event.is_plain("Escape") {
            return KeyVerdict::Cancel;
        }
        if !combo::is_recordable_key(&event.key) {
            return KeyVerdict::Invalid;
        }
        match combo::encode(event) {
            Some(token) => KeyVerdict::Combo(token),
            None => KeyVerdict::Ignore,
        }
    }

    /// Bind `combo` to this recording's selector on `domain`.
    ///
    /// The table is read from the store right before writing, so edits made
    /// elsewhere since the page loaded are not overwritten. Nothing is written
    /// on conflict.
    pub async fn commit<S: KeyValueStore + ?Sized>(
        &self,
        store: &S,
        domain: &str,
        combo: ComboToken,
    ) -> Result<RecordOutcome, StoreError> {
        let mut table = store::load_table(store, domain).await?;
        let upsert = match table.upsert(&self.selector, combo.clone()) {
            Ok(upsert) => upsert,
            Err(TableError::Conflict { combo, selector }) => {
                debug!("{} on {} is taken by {}", combo, domain, selector);
                return Ok(RecordOutcome::Conflict { combo, selector });
            }
            // Upsert reports conflicts or a blank selector only.
            Err(_) => return Ok(RecordOutcome::MissingIdentifier),
        };

        if upsert != Upsert::Unchanged {
            store::save_table(store, domain, &table).await?;
        }
        info!("Bound {} to {} on {}", combo, self.selector, domain);
        Ok(RecordOutcome::Saved {
            combo,
            upsert,
            table,
        })
    }
}

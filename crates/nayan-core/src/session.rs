//! Per-page core instance.
//!
//! A [`PageSession`] owns everything one page needs: the cached table of its
//! domain, the feedback language, and the current mode. Events are routed by
//! mode, so the picker and the recorder always run instead of the dispatcher.

use crate::config::NayanConfig;
use crate::dispatcher::{self, Activation, Dispatch};
use crate::domain;
use crate::event::{EventOutcome, KeyEvent, PageEvent};
use crate::feedback::Feedback;
use crate::locale::Language;
use crate::page::{ElementId, Page, ToastKind};
use crate::picker::{Picker, PickerOutcome};
use crate::recording::{KeyVerdict, RecordOutcome, Recording};
use crate::selector::generate_selector;
use crate::store::KeyValueStore;
use nayan_common::binding::ShortcutTable;
use nayan_common::error::StoreError;
use nayan_common::protocol::{HostNotification, PageCommand};
use nayan_common::storage::{LANGUAGE_KEY, StorageChange, StoredValue};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Picking,
    Recording,
}

pub struct PageSession<P, S> {
    page: P,
    store: S,
    config: NayanConfig,
    domain: Option<String>,
    table: ShortcutTable,
    language: Language,
    picker: Picker,
    recording: Option<Recording>,
    invalidated: bool,
}

impl<P: Page, S: KeyValueStore> PageSession<P, S> {
    /// Attach to `page` and load its domain's table and the language preference.
    pub async fn start(page: P, store: S, config: NayanConfig) -> Self {
        let domain = domain::domain_for(&page.url());
        let picker = Picker::new(
            config.picker.clone(),
            config.feedback.highlight_outline(),
        );
        let mut session = Self {
            page,
            store,
            language: Language::resolve(&config.language),
            config,
            domain,
            table: ShortcutTable::new(),
            picker,
            recording: None,
            invalidated: false,
        };
        match &session.domain {
            Some(d) => info!("Page core attached to {}", d),
            None => debug!("Page core inert on {}", session.page.url()),
        }
        session.reload().await;
        session
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Cached table of the current domain.
    pub fn table(&self) -> &ShortcutTable {
        &self.table
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn recording(&self) -> Option<&Recording> {
        self.recording.as_ref()
    }

    pub fn mode(&self) -> Mode {
        if self.picker.is_active() {
            Mode::Picking
        } else if self.recording.is_some() {
            Mode::Recording
        } else {
            Mode::Idle
        }
    }

    pub fn is_invalidated(&self) -> bool {
        self.invalidated
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.store.subscribe()
    }

    /// Re-read the table and language from the store.
    pub async fn reload(&mut self) {
        if !self.guard() {
            return;
        }
        let domain = self.domain.clone();
        let mut keys = vec![LANGUAGE_KEY];
        if let Some(d) = domain.as_deref() {
            keys.push(d);
        }
        match self.store.get(&keys).await {
            Ok(mut values) => {
                self.table = domain
                    .as_deref()
                    .and_then(|d| values.remove(d))
                    .and_then(StoredValue::into_table)
                    .unwrap_or_default();
                if let Some(code) = values.get(LANGUAGE_KEY).and_then(StoredValue::as_language) {
                    self.language = Language::resolve(code);
                }
                debug!("Loaded {} shortcuts", self.table.len());
            }
            Err(e) => self.store_failed(e),
        }
    }

    /// Replace the page after a navigation. Picking and recording do not survive.
    pub async fn navigate(&mut self, page: P) {
        self.picker.cancel(&mut self.page);
        self.recording = None;
        self.page = page;
        self.domain = domain::domain_for(&self.page.url());
        self.table = ShortcutTable::new();
        self.reload().await;
    }

    pub fn handle_command(&mut self, command: PageCommand) {
        if !self.guard() {
            return;
        }
        match command {
            PageCommand::TogglePicker => self.toggle_picker(),
            PageCommand::ChangeLanguage { language } => {
                self.language = Language::resolve(&language);
                let feedback = Feedback::new(&self.config.feedback, self.language);
                feedback.announce(&mut self.page, feedback.messages().lang_changed);
            }
            PageCommand::TriggerToast { message } => {
                let feedback = Feedback::new(&self.config.feedback, self.language);
                feedback.toast(&mut self.page, &message, ToastKind::Info);
            }
        }
    }

    /// Enter picking mode. Re-entry while picking is a no-op.
    pub fn begin_picking(&mut self) -> bool {
        if !self.guard() || self.domain.is_none() {
            return false;
        }
        if self.picker.is_active() {
            return false;
        }
        if self.recording.take().is_some() {
            debug!("Pending recording abandoned for a new pick");
        }
        if !self.picker.begin(&mut self.page) {
            return false;
        }
        let feedback = Feedback::new(&self.config.feedback, self.language);
        feedback.announce(&mut self.page, feedback.messages().picker_on);
        true
    }

    pub fn cancel_picking(&mut self) -> bool {
        if !self.picker.cancel(&mut self.page) {
            return false;
        }
        let feedback = Feedback::new(&self.config.feedback, self.language);
        feedback.announce(&mut self.page, feedback.messages().picker_off);
        true
    }

    fn toggle_picker(&mut self) {
        if !self.cancel_picking() {
            self.begin_picking();
        }
    }

    pub async fn handle_event(&mut self, event: PageEvent) -> EventOutcome {
        if !self.guard() {
            return EventOutcome::pass();
        }
        if self.picker.is_active() {
            return self.picking_event(event);
        }
        if self.recording.is_some() {
            return match event {
                PageEvent::KeyDown(key) => self.recording_key(&key).await,
                _ => EventOutcome::pass(),
            };
        }
        match event {
            PageEvent::KeyDown(key) => self.dispatch_key(&key),
            _ => EventOutcome::pass(),
        }
    }

    /// Bring the cached state in line with a store notification.
    pub fn apply_storage_change(&mut self, change: &StorageChange) {
        if change.key == LANGUAGE_KEY {
            self.language = change
                .new_value
                .as_ref()
                .and_then(StoredValue::as_language)
                .map(Language::resolve)
                .unwrap_or_else(|| Language::resolve(&self.config.language));
            return;
        }
        if self.domain.as_deref() != Some(change.key.as_str()) {
            return;
        }
        self.table = change
            .new_value
            .as_ref()
            .and_then(StoredValue::as_table)
            .cloned()
            .unwrap_or_default();
        debug!("Table for {} now has {} shortcuts", change.key, self.table.len());
    }

    fn picking_event(&mut self, event: PageEvent) -> EventOutcome {
        let outcome = match event {
            PageEvent::PointerOver { target } | PageEvent::FocusIn { target } => {
                self.picker.on_pointer(&mut self.page, target);
                return EventOutcome::pass();
            }
            PageEvent::Click { target } => self.picker.on_click(&mut self.page, target),
            PageEvent::KeyDown(key) => match self.picker.on_key(&mut self.page, &key) {
                Some(outcome) => Some(outcome),
                None => return EventOutcome::pass(),
            },
        };

        match outcome {
            Some(PickerOutcome::Selected(element)) => self.on_selected(element),
            Some(PickerOutcome::Cancelled) => {
                let feedback = Feedback::new(&self.config.feedback, self.language);
                feedback.announce(&mut self.page, feedback.messages().picker_off);
            }
            None => {}
        }
        EventOutcome::suppressed()
    }

    fn on_selected(&mut self, element: ElementId) {
        let feedback = Feedback::new(&self.config.feedback, self.language);
        let Some(selector) = generate_selector(&self.page, element) else {
            feedback.announce(&mut self.page, feedback.messages().not_found);
            return;
        };
        info!("Picked {}", selector);
        feedback.announce(&mut self.page, feedback.messages().selected);
        self.page.pulse(
            element,
            &self.config.feedback.confirm_outline(),
            self.config.feedback.confirm_duration(),
        );
        self.recording = Some(Recording::new(selector, Some(element)));
    }

    async fn recording_key(&mut self, key: &KeyEvent) -> EventOutcome {
        let Some(recording) = self.recording.clone() else {
            return EventOutcome::pass();
        };
        let feedback = Feedback::new(&self.config.feedback, self.language);
        let messages = feedback.messages();
        let target = recording
            .feedback_target
            .filter(|&el| self.page.is_connected(el));

        match Recording::classify(key, &self.config.recording) {
            KeyVerdict::Ignore => {}
            KeyVerdict::Cancel => {
                self.recording = None;
                feedback.announce(&mut self.page, messages.recording_cancelled);
            }
            KeyVerdict::Invalid => {
                feedback.error(&mut self.page, messages.invalid_key, target);
            }
            KeyVerdict::Combo(combo) => {
                let Some(domain) = self.domain.clone() else {
                    self.recording = None;
                    return EventOutcome::suppressed();
                };
                match recording.commit(&self.store, &domain, combo).await {
                    Ok(RecordOutcome::Saved { combo, table, .. }) => {
                        self.table = table;
                        self.recording = None;
                        let text = format!("{}{}", messages.saved, combo);
                        feedback.success(&mut self.page, &text, target);
                    }
                    Ok(RecordOutcome::Conflict { .. }) => {
                        feedback.error(&mut self.page, messages.conflict, target);
                    }
                    Ok(RecordOutcome::MissingIdentifier) => {
                        self.recording = None;
                        feedback.error(&mut self.page, messages.missing_id, target);
                    }
                    Err(e) => self.store_failed(e),
                }
            }
        }
        EventOutcome::suppressed()
    }

    fn dispatch_key(&mut self, key: &KeyEvent) -> EventOutcome {
        if self.domain.is_none() {
            return EventOutcome::pass();
        }
        let activation = Activation {
            outline: self.config.feedback.pulse_outline(),
            duration: self.config.feedback.pulse_duration(),
        };
        let feedback = Feedback::new(&self.config.feedback, self.language);
        match dispatcher::dispatch(&mut self.page, &self.table, key, &activation) {
            Dispatch::Activated { binding, .. } => {
                feedback.announce(&mut self.page, feedback.messages().clicked);
                EventOutcome {
                    suppress: true,
                    notification: Some(HostNotification::ShortcutPress { key: binding.combo }),
                }
            }
            Dispatch::Missing { .. } => {
                feedback.announce(&mut self.page, feedback.messages().not_found);
                EventOutcome::suppressed()
            }
            Dispatch::Unbound(_) | Dispatch::Ignored => EventOutcome::pass(),
        }
    }

    /// False once the host connection is gone; every entry point checks it.
    fn guard(&mut self) -> bool {
        if !self.invalidated && !self.store.is_available() {
            self.store_failed(StoreError::ContextInvalidated);
        }
        !self.invalidated
    }

    fn store_failed(&mut self, error: StoreError) {
        if error.is_context_invalidated() {
            if !self.invalidated {
                info!("Extension context invalidated; page core disabled");
            }
            self.invalidated = true;
            self.recording = None;
            self.picker.cancel(&mut self.page);
            return;
        }
        warn!("Storage error: {}", error);
    }
}

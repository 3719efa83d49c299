//! Line-oriented driver for a [`PageSession`] over an in-memory page.
//!
//! Each command feeds one event or host command to the session and returns
//! what the page saw, one effect per line. Store changes are applied around
//! every command, the way a content script applies `storage.onChanged`.

use nayan_common::combo::{ComboError, ComboToken};
use nayan_common::protocol::PageCommand;
use nayan_common::storage::StorageChange;
use nayan_core::config::NayanConfig;
use nayan_core::dom::{MemoryPage, PageEffect};
use nayan_core::event::{EventOutcome, KeyEvent, PageEvent};
use nayan_core::page::{AudioCue, ElementId, Page, ToastKind};
use nayan_core::selector::generate_selector;
use nayan_core::session::PageSession;
use nayan_core::store::KeyValueStore;
use thiserror::Error;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("No element matches {0}")]
    ElementNotFound(String),
    #[error("Invalid key combination: {0}")]
    Combo(#[from] ComboError),
}

pub const HELP: &[&str] = &[
    "pick                      toggle the element picker",
    "hover <selector>          move the pointer over an element",
    "focus <selector>          move keyboard focus to an element",
    "click <selector>          click an element",
    "press <combo> [in <sel>]  press a key combination (e.g. shift+s, esc)",
    "remove <selector>         detach an element from the page",
    "lang <code>               switch feedback language (en, hi, mr)",
    "toast <message>           show a toast on the page",
    "table                     list shortcuts of this site",
    "mode                      show the current mode",
    "reload                    re-read shortcuts from the store",
];

pub struct Simulator<S> {
    session: PageSession<MemoryPage, S>,
    changes: broadcast::Receiver<StorageChange>,
}

impl<S: KeyValueStore> Simulator<S> {
    pub async fn new(page: MemoryPage, store: S, config: NayanConfig) -> Self {
        let session = PageSession::start(page, store, config).await;
        let changes = session.subscribe();
        Self { session, changes }
    }

    pub fn session(&self) -> &PageSession<MemoryPage, S> {
        &self.session
    }

    pub async fn execute_line(&mut self, line: &str) -> Result<String, SimulatorError> {
        let line = line.trim();
        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let mut output = Vec::new();
        self.sync().await;

        match command {
            "pick" => self.session.handle_command(PageCommand::TogglePicker),
            "hover" => {
                let target = self.find(rest, "hover <selector>")?;
                self.event(PageEvent::PointerOver { target }, &mut output).await;
            }
            "focus" => {
                let target = self.find(rest, "focus <selector>")?;
                self.event(PageEvent::FocusIn { target }, &mut output).await;
            }
            "click" => {
                let target = self.find(rest, "click <selector>")?;
                let outcome = self.session.handle_event(PageEvent::Click { target }).await;
                if !outcome.suppress {
                    self.session.page_mut().click(target);
                }
            }
            "press" => {
                if rest.is_empty() {
                    return Err(SimulatorError::Usage("press <combo> [in <selector>]"));
                }
                let (combo, target) = match rest.split_once(" in ") {
                    Some((combo, selector)) => {
                        (combo, Some(self.find(selector.trim(), "press <combo> in <selector>")?))
                    }
                    None => (rest, None),
                };
                let mut event = KeyEvent::from_combo(&ComboToken::parse(combo)?);
                event.target = target.or_else(|| self.session.page().active_element());
                self.event(PageEvent::KeyDown(event), &mut output).await;
            }
            "remove" => {
                let target = self.find(rest, "remove <selector>")?;
                self.session.page_mut().remove(target);
                output.push(format!("removed {}", rest));
            }
            "lang" => {
                if rest.is_empty() {
                    return Err(SimulatorError::Usage("lang <code>"));
                }
                self.session.handle_command(PageCommand::ChangeLanguage {
                    language: rest.to_string(),
                });
            }
            "toast" => {
                let message = match rest {
                    "" => self.session.language().messages().extension_active.to_string(),
                    text => text.to_string(),
                };
                self.session
                    .handle_command(PageCommand::TriggerToast { message });
            }
            "table" => {
                let table = self.session.table();
                if table.is_empty() {
                    output.push("(no shortcuts)".to_string());
                }
                for binding in table {
                    output.push(format!("{:<16} {}", binding.combo, binding.selector));
                }
            }
            "mode" => output.push(format!("{:?}", self.session.mode()).to_lowercase()),
            "reload" => self.session.reload().await,
            "help" => output.extend(HELP.iter().map(|s| s.to_string())),
            other => return Err(SimulatorError::UnknownCommand(other.to_string())),
        }

        self.sync().await;
        let effects = self.session.page_mut().take_effects();
        output.extend(effects.iter().map(|e| self.describe_effect(e)));
        Ok(output.join("\n"))
    }

    /// Apply pending store notifications to the session.
    pub async fn sync(&mut self) {
        loop {
            match self.changes.try_recv() {
                Ok(change) => self.session.apply_storage_change(&change),
                Err(TryRecvError::Lagged(missed)) => {
                    debug!("Missed {} store changes, reloading", missed);
                    self.session.reload().await;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }

    async fn event(&mut self, event: PageEvent, output: &mut Vec<String>) {
        let outcome = self.session.handle_event(event).await;
        if let Some(line) = describe_outcome(&outcome) {
            output.push(line);
        }
    }

    fn find(&self, selector: &str, usage: &'static str) -> Result<ElementId, SimulatorError> {
        if selector.is_empty() {
            return Err(SimulatorError::Usage(usage));
        }
        self.session
            .page()
            .query_selector(selector)
            .ok_or_else(|| SimulatorError::ElementNotFound(selector.to_string()))
    }

    fn describe(&self, element: ElementId) -> String {
        let page = self.session.page();
        generate_selector(page, element).unwrap_or_else(|| format!("<detached #{}>", element))
    }

    fn describe_effect(&self, effect: &PageEffect) -> String {
        match effect {
            PageEffect::Clicked(el) => format!("clicked {}", self.describe(*el)),
            PageEffect::Focused { element, .. } => format!("focused {}", self.describe(*element)),
            PageEffect::Outlined {
                element,
                outline: Some(outline),
            } => format!("outlined {} ({})", self.describe(*element), outline.color),
            PageEffect::Outlined { element, outline: None } => {
                format!("outline cleared on {}", self.describe(*element))
            }
            PageEffect::Pulsed {
                element,
                outline,
                duration,
            } => format!(
                "pulsed {} ({}, {}ms)",
                self.describe(*element),
                outline.color,
                duration.as_millis()
            ),
            PageEffect::PickingCursor(true) => "cursor: crosshair".to_string(),
            PageEffect::PickingCursor(false) => "cursor: default".to_string(),
            PageEffect::Announced(text) => format!("announce: {}", text),
            PageEffect::Toast(toast) => {
                let kind = match toast.kind {
                    ToastKind::Info => "info",
                    ToastKind::Success => "success",
                    ToastKind::Error => "error",
                };
                format!("toast [{}]: {}", kind, toast.message)
            }
            PageEffect::Cue(AudioCue::Success) => "cue: success".to_string(),
            PageEffect::Cue(AudioCue::Error) => "cue: error".to_string(),
        }
    }
}

fn describe_outcome(outcome: &EventOutcome) -> Option<String> {
    let notification = outcome.notification.as_ref()?;
    match serde_json::to_string(notification) {
        Ok(json) => Some(format!("notify: {}", json)),
        Err(e) => {
            warn!("Failed to encode notification: {}", e);
            None
        }
    }
}

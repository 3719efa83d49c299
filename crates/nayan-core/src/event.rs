use crate::page::ElementId;
use nayan_common::combo::{ComboToken, Modifiers};
use nayan_common::protocol::HostNotification;
use serde::{Deserialize, Serialize};

/// A keydown as seen by the page core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Key identity as reported by the browser (`"a"`, `"Enter"`, `"Shift"`).
    pub key: String,
    #[serde(flatten)]
    pub modifiers: Modifiers,
    /// Element the event was dispatched to.
    #[serde(default)]
    pub target: Option<ElementId>,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::NONE,
            target: None,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.modifiers.meta = true;
        self
    }

    pub fn on(mut self, target: ElementId) -> Self {
        self.target = Some(target);
        self
    }

    /// Synthesize the keydown that would produce `combo`.
    pub fn from_combo(combo: &ComboToken) -> Self {
        let key = match combo.key() {
            "Space" => " ",
            other => other,
        };
        Self::new(key).with_modifiers(combo.modifiers())
    }

    pub fn is_plain(&self, key: &str) -> bool {
        self.modifiers.is_empty() && self.key == key
    }
}

/// DOM events the page core listens to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PageEvent {
    KeyDown(KeyEvent),
    PointerOver { target: ElementId },
    FocusIn { target: ElementId },
    Click { target: ElementId },
}

/// What the host must do with the event after the core handled it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// Prevent the default action and stop propagation.
    pub suppress: bool,
    pub notification: Option<HostNotification>,
}

impl EventOutcome {
    pub fn pass() -> Self {
        Self::default()
    }

    pub fn suppressed() -> Self {
        Self {
            suppress: true,
            notification: None,
        }
    }
}

//! Messages exchanged between the popup/background surfaces and a page core.

use crate::combo::ComboToken;
use serde::{Deserialize, Serialize};

/// Commands sent to a running page core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum PageCommand {
    #[serde(rename = "togglePicker")]
    TogglePicker,
    #[serde(rename = "changeLanguage")]
    ChangeLanguage { language: String },
    /// Sent by the background page once a tab finishes loading.
    #[serde(rename = "TRIGGER_TOAST")]
    TriggerToast { message: String },
}

/// Notifications a page core sends back to its host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostNotification {
    #[serde(rename = "shortcutPress")]
    ShortcutPress { key: ComboToken },
}

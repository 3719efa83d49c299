use crate::page::{Outline, Toast, ToastKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NayanConfig {
    #[serde(default)]
    pub feedback: FeedbackConfig,
    #[serde(default)]
    pub picker: PickerConfig,
    #[serde(default)]
    pub recording: RecordingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    /// Language used until the store holds a preference.
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for NayanConfig {
    fn default() -> Self {
        Self {
            feedback: FeedbackConfig::default(),
            picker: PickerConfig::default(),
            recording: RecordingConfig::default(),
            storage: StorageConfig::default(),
            language: default_language(),
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackConfig {
    /// Delay between clearing and re-setting the live region.
    #[serde(default = "default_announce_delay_ms")]
    pub announce_delay_ms: u64,
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,
    #[serde(default = "default_toast_fade_ms")]
    pub toast_fade_ms: u64,
    /// Outline shown on an element activated by a shortcut.
    #[serde(default = "default_pulse_duration_ms")]
    pub pulse_duration_ms: u64,
    #[serde(default = "default_pulse_color")]
    pub pulse_color: String,
    /// Outline shown on the element chosen in the picker.
    #[serde(default = "default_confirm_flash_ms")]
    pub confirm_flash_ms: u64,
    #[serde(default = "default_confirm_color")]
    pub confirm_color: String,
    #[serde(default = "default_error_color")]
    pub error_color: String,
    #[serde(default = "default_highlight_color")]
    pub highlight_color: String,
    #[serde(default = "default_outline_width_px")]
    pub outline_width_px: u32,
    #[serde(default = "default_audio_cues")]
    pub audio_cues: bool,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            announce_delay_ms: default_announce_delay_ms(),
            toast_duration_ms: default_toast_duration_ms(),
            toast_fade_ms: default_toast_fade_ms(),
            pulse_duration_ms: default_pulse_duration_ms(),
            pulse_color: default_pulse_color(),
            confirm_flash_ms: default_confirm_flash_ms(),
            confirm_color: default_confirm_color(),
            error_color: default_error_color(),
            highlight_color: default_highlight_color(),
            outline_width_px: default_outline_width_px(),
            audio_cues: default_audio_cues(),
        }
    }
}

impl FeedbackConfig {
    pub fn highlight_outline(&self) -> Outline {
        self.outline(&self.highlight_color)
    }

    pub fn pulse_outline(&self) -> Outline {
        self.outline(&self.pulse_color)
    }

    pub fn confirm_outline(&self) -> Outline {
        self.outline(&self.confirm_color)
    }

    pub fn error_outline(&self) -> Outline {
        self.outline(&self.error_color)
    }

    pub fn announce_delay(&self) -> Duration {
        Duration::from_millis(self.announce_delay_ms)
    }

    pub fn pulse_duration(&self) -> Duration {
        Duration::from_millis(self.pulse_duration_ms)
    }

    pub fn confirm_duration(&self) -> Duration {
        Duration::from_millis(self.confirm_flash_ms)
    }

    pub fn toast(&self, message: impl Into<String>, kind: ToastKind) -> Toast {
        Toast {
            message: message.into(),
            kind,
            duration: Duration::from_millis(self.toast_duration_ms),
            fade: Duration::from_millis(self.toast_fade_ms),
        }
    }

    fn outline(&self, color: &str) -> Outline {
        Outline {
            color: color.to_string(),
            width_px: self.outline_width_px,
        }
    }
}

fn default_announce_delay_ms() -> u64 {
    50
}

fn default_toast_duration_ms() -> u64 {
    3000
}

fn default_toast_fade_ms() -> u64 {
    300
}

fn default_pulse_duration_ms() -> u64 {
    200
}

fn default_pulse_color() -> String {
    "#00e676".to_string()
}

fn default_confirm_flash_ms() -> u64 {
    600
}

fn default_confirm_color() -> String {
    "#2979ff".to_string()
}

fn default_error_color() -> String {
    "#cc0000".to_string()
}

fn default_highlight_color() -> String {
    "#ffd600".to_string()
}

fn default_outline_width_px() -> u32 {
    3
}

fn default_audio_cues() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickerConfig {
    /// Tags treated as interactive when looking for the element to highlight.
    #[serde(default = "default_interactive_tags")]
    pub interactive_tags: Vec<String>,
    #[serde(default = "default_interactive_roles")]
    pub interactive_roles: Vec<String>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            interactive_tags: default_interactive_tags(),
            interactive_roles: default_interactive_roles(),
        }
    }
}

fn default_interactive_tags() -> Vec<String> {
    ["button", "a", "input", "select", "textarea"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_interactive_roles() -> Vec<String> {
    vec!["button".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// A bare Escape abandons recording instead of being recorded.
    #[serde(default = "default_cancel_on_escape")]
    pub cancel_on_escape: bool,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            cancel_on_escape: default_cancel_on_escape(),
        }
    }
}

fn default_cancel_on_escape() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(".nayan").join("shortcuts.json"),
        None => PathBuf::from("./nayan-shortcuts.json"),
    }
}

//! User-facing feedback: live-region announcements, toasts, audio cues.

use crate::config::FeedbackConfig;
use crate::locale::{Language, Messages};
use crate::page::{Announcement, AudioCue, ElementId, Page, ToastKind};

/// Feedback channel bound to one configuration and language.
pub struct Feedback<'a> {
    config: &'a FeedbackConfig,
    language: Language,
}

impl<'a> Feedback<'a> {
    pub fn new(config: &'a FeedbackConfig, language: Language) -> Self {
        Self { config, language }
    }

    pub fn messages(&self) -> &'static Messages {
        self.language.messages()
    }

    /// Speak `text` through the live region.
    pub fn announce<P: Page + ?Sized>(&self, page: &mut P, text: &str) {
        page.announce(&Announcement {
            text: text.to_string(),
            delay: self.config.announce_delay(),
        });
    }

    pub fn toast<P: Page + ?Sized>(&self, page: &mut P, text: &str, kind: ToastKind) {
        page.show_toast(&self.config.toast(text, kind));
    }

    /// Announcement, toast and cue for a completed action.
    pub fn success<P: Page + ?Sized>(&self, page: &mut P, text: &str, element: Option<ElementId>) {
        self.announce(page, text);
        self.toast(page, text, ToastKind::Success);
        if let Some(element) = element {
            page.pulse(
                element,
                &self.config.confirm_outline(),
                self.config.confirm_duration(),
            );
        }
        if self.config.audio_cues {
            page.play_cue(AudioCue::Success);
        }
    }

    /// Announcement, toast and cue for a rejected action the user can retry.
    pub fn error<P: Page + ?Sized>(&self, page: &mut P, text: &str, element: Option<ElementId>) {
        self.announce(page, text);
        self.toast(page, text, ToastKind::Error);
        if let Some(element) = element {
            page.pulse(
                element,
                &self.config.error_outline(),
                self.config.confirm_duration(),
            );
        }
        if self.config.audio_cues {
            page.play_cue(AudioCue::Error);
        }
    }
}

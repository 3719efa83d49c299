//! Key event → combo token encoding, shared by recording and dispatch.

use crate::event::KeyEvent;
pub use nayan_common::combo::{ComboError, ComboToken, Modifiers, is_modifier_key};

/// Encode a keydown. Returns `None` for bare modifier presses and empty keys.
pub fn encode(event: &KeyEvent) -> Option<ComboToken> {
    ComboToken::new(event.modifiers, &event.key).ok()
}

/// Keys a user may record: anything except single non-alphanumeric characters.
pub fn is_recordable_key(key: &str) -> bool {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.is_alphanumeric(),
        (Some(_), Some(_)) => true,
        (None, _) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_modifiers_are_ignored() {
        for key in ["Control", "Shift", "Alt", "Meta"] {
            assert_eq!(encode(&KeyEvent::new(key).shift()), None);
        }
    }

    #[test]
    fn recordable_keys() {
        assert!(is_recordable_key("k"));
        assert!(is_recordable_key("7"));
        assert!(is_recordable_key("F5"));
        assert!(!is_recordable_key("/"));
        assert!(!is_recordable_key(" "));
        assert!(!is_recordable_key(""));
    }
}

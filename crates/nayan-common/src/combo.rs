//! Canonical key-combination tokens.
//!
//! A [`ComboToken`] is the string form of a physical key combination, e.g.
//! `Ctrl+Shift+K`. Modifiers always appear in the order `Ctrl, Alt, Shift,
//! Meta`, followed by the base key. Every token in the system is built through
//! [`ComboToken::new`], so recording and dispatch cannot disagree on ordering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Key identities reported for a bare modifier press.
pub const MODIFIER_KEYS: [&str; 4] = ["Control", "Shift", "Alt", "Meta"];

const SEPARATOR: char = '+';

/// Named keys with their canonical spelling, used when parsing typed combos.
const NAMED_KEYS: &[&str] = &[
    "Enter",
    "Escape",
    "Tab",
    "Backspace",
    "Delete",
    "Insert",
    "Home",
    "End",
    "PageUp",
    "PageDown",
    "ArrowUp",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "Space",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComboError {
    #[error("Key combination has no base key")]
    EmptyKey,
    #[error("A modifier on its own is not a shortcut: {0}")]
    ModifierOnly(String),
    #[error("Key combination names more than one base key: {0}")]
    MultipleKeys(String),
}

/// Modifier flags of a key event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub fn is_empty(&self) -> bool {
        !(self.ctrl || self.alt || self.shift || self.meta)
    }

    /// Labels of the set modifiers, in canonical order.
    pub fn labels(&self) -> Vec<&'static str> {
        [
            (self.ctrl, "Ctrl"),
            (self.alt, "Alt"),
            (self.shift, "Shift"),
            (self.meta, "Meta"),
        ]
        .into_iter()
        .filter_map(|(set, label)| set.then_some(label))
        .collect()
    }

    /// Set the flag named by `name`. Returns false if `name` is not a modifier.
    fn set_named(&mut self, name: &str) -> bool {
        match name.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => self.ctrl = true,
            "alt" | "option" | "opt" => self.alt = true,
            "shift" => self.shift = true,
            "meta" | "cmd" | "command" | "super" | "win" => self.meta = true,
            _ => return false,
        }
        true
    }
}

/// Canonical encoding of a key combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComboToken(String);

impl ComboToken {
    /// Build a token from modifier flags and a raw key identity.
    ///
    /// Single-character keys are uppercased, the space bar becomes `Space`,
    /// and longer key names pass through unchanged.
    pub fn new(modifiers: Modifiers, key: &str) -> Result<Self, ComboError> {
        let key = normalize_key(key)?;
        let mut parts = modifiers.labels();
        parts.push(&key);
        Ok(Self(parts.join("+")))
    }

    /// Parse a combo typed by a person, e.g. `shift+s` or `Cmd+Alt+k`.
    ///
    /// Modifier aliases and any ordering are accepted; the result is always
    /// canonical.
    pub fn parse(input: &str) -> Result<Self, ComboError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ComboError::EmptyKey);
        }

        // The `+` key itself: "+" or "Shift++".
        let (head, key) = if input == "+" {
            ("", "+")
        } else if let Some(head) = input.strip_suffix("++") {
            (head, "+")
        } else {
            match input.rsplit_once(SEPARATOR) {
                Some((head, key)) => (head, key.trim()),
                None => ("", input),
            }
        };

        let mut modifiers = Modifiers::NONE;
        for part in head.split(SEPARATOR).map(str::trim).filter(|p| !p.is_empty()) {
            if !modifiers.set_named(part) {
                return Err(ComboError::MultipleKeys(input.to_string()));
            }
        }

        if key.is_empty() {
            return Err(ComboError::EmptyKey);
        }
        let mut probe = Modifiers::NONE;
        if probe.set_named(key) {
            return Err(ComboError::ModifierOnly(key.to_string()));
        }

        Self::new(modifiers, &canonical_key_name(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The base key, without modifiers.
    pub fn key(&self) -> &str {
        if self.0.ends_with("++") || self.0 == "+" {
            return "+";
        }
        self.0.rsplit(SEPARATOR).next().unwrap_or(&self.0)
    }

    /// The modifier flags encoded in the token.
    pub fn modifiers(&self) -> Modifiers {
        let key_len = self.key().len();
        let head = &self.0[..self.0.len() - key_len];
        let mut modifiers = Modifiers::NONE;
        for part in head.split(SEPARATOR).filter(|p| !p.is_empty()) {
            modifiers.set_named(part);
        }
        modifiers
    }

    /// True for the placeholder left behind by a blank row.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ComboToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ComboToken {
    type Err = ComboError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// True if `key` is the identity of a bare modifier press.
pub fn is_modifier_key(key: &str) -> bool {
    MODIFIER_KEYS.contains(&key)
}

fn normalize_key(key: &str) -> Result<String, ComboError> {
    if key.is_empty() {
        return Err(ComboError::EmptyKey);
    }
    if is_modifier_key(key) {
        return Err(ComboError::ModifierOnly(key.to_string()));
    }
    if key == " " {
        return Ok("Space".to_string());
    }
    if key.chars().count() == 1 {
        return Ok(key.to_uppercase());
    }
    Ok(key.to_string())
}

fn canonical_key_name(key: &str) -> String {
    if key.eq_ignore_ascii_case("esc") {
        return "Escape".to_string();
    }
    if key.eq_ignore_ascii_case("return") {
        return "Enter".to_string();
    }
    if let Some(named) = NAMED_KEYS.iter().find(|n| n.eq_ignore_ascii_case(key)) {
        return (*named).to_string();
    }
    // Function keys: f5 -> F5
    let mut chars = key.chars();
    if let Some('f' | 'F') = chars.next() {
        let rest = chars.as_str();
        if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
            return format!("F{}", rest);
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_follow_fixed_order() {
        let all = Modifiers {
            ctrl: true,
            alt: true,
            shift: true,
            meta: true,
        };
        let token = ComboToken::new(all, "k").unwrap();
        assert_eq!(token.as_str(), "Ctrl+Alt+Shift+Meta+K");
    }

    #[test]
    fn parse_reorders_and_resolves_aliases() {
        let token = ComboToken::parse("cmd + shift + control + s").unwrap();
        assert_eq!(token.as_str(), "Ctrl+Shift+Meta+S");
        assert_eq!(ComboToken::parse("esc").unwrap().as_str(), "Escape");
        assert_eq!(ComboToken::parse("alt+f5").unwrap().as_str(), "Alt+F5");
    }

    #[test]
    fn parse_handles_plus_key() {
        let token = ComboToken::parse("Shift++").unwrap();
        assert_eq!(token.as_str(), "Shift++");
        assert_eq!(token.key(), "+");
        assert!(token.modifiers().shift);
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert_eq!(ComboToken::parse(""), Err(ComboError::EmptyKey));
        assert!(matches!(
            ComboToken::parse("Ctrl+Shift"),
            Err(ComboError::ModifierOnly(_))
        ));
        assert!(matches!(
            ComboToken::parse("A+B"),
            Err(ComboError::MultipleKeys(_))
        ));
    }

    #[test]
    fn space_is_named() {
        let token = ComboToken::new(Modifiers::NONE, " ").unwrap();
        assert_eq!(token.as_str(), "Space");
    }
}

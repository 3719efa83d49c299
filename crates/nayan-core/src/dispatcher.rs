//! Steady-state shortcut dispatch.

use crate::combo::{self, ComboToken, is_modifier_key};
use crate::event::KeyEvent;
use crate::page::{ElementId, Outline, Page};
use nayan_common::binding::{ShortcutBinding, ShortcutTable};
use std::time::Duration;
use tracing::debug;

/// Tags whose keystrokes belong to the user's typing, not to shortcuts.
const TEXT_INPUT_TAGS: [&str; 2] = ["input", "textarea"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Typing, bare modifier, or no target domain.
    Ignored,
    /// Encoded, but nothing is bound to the combo.
    Unbound(ComboToken),
    Activated {
        binding: ShortcutBinding,
        element: ElementId,
    },
    /// Bound, but the selector no longer resolves on this page.
    Missing { binding: ShortcutBinding },
}

impl Dispatch {
    /// Whether the page must not see the keystroke.
    pub fn suppresses(&self) -> bool {
        matches!(self, Dispatch::Activated { .. } | Dispatch::Missing { .. })
    }
}

/// Activation styling.
#[derive(Debug, Clone)]
pub struct Activation {
    pub outline: Outline,
    pub duration: Duration,
}

/// True if `element` (or an ancestor) accepts typed text.
pub fn is_text_input<P: Page + ?Sized>(page: &P, element: ElementId) -> bool {
    if page
        .tag_name(element)
        .is_some_and(|tag| TEXT_INPUT_TAGS.contains(&tag.as_str()))
    {
        return true;
    }
    let mut current = Some(element);
    while let Some(el) = current {
        if let Some(value) = page.attribute(el, "contenteditable") {
            return !value.eq_ignore_ascii_case("false");
        }
        current = page.parent(el);
    }
    false
}

/// Match a keydown against `table` and activate the bound element.
pub fn dispatch<P: Page + ?Sized>(
    page: &mut P,
    table: &ShortcutTable,
    event: &KeyEvent,
    activation: &Activation,
) -> Dispatch {
    if is_modifier_key(&event.key) {
        return Dispatch::Ignored;
    }
    if event.target.is_some_and(|target| is_text_input(&*page, target)) {
        return Dispatch::Ignored;
    }
    let Some(combo) = combo::encode(event) else {
        return Dispatch::Ignored;
    };
    let Some(binding) = table.find_by_combo(&combo) else {
        return Dispatch::Unbound(combo);
    };

    let binding = binding.clone();
    match page.query_selector(&binding.selector) {
        Some(element) => {
            page.click(element);
            page.focus(element, false);
            page.pulse(element, &activation.outline, activation.duration);
            debug!("{} activated {}", binding.combo, binding.selector);
            Dispatch::Activated { binding, element }
        }
        None => {
            debug!("{} is bound to {}, which is not on the page", binding.combo, binding.selector);
            Dispatch::Missing { binding }
        }
    }
}

//! Picker state machine.
//!
//! ```text
//! Idle --begin--> Picking --click / Enter--> Selected --> Idle
//!                    |
//!                    +----------Escape-----> Cancelled --> Idle
//! ```
//!
//! While picking, hover and focus events move the highlight to the nearest
//! interactive ancestor of the event target.

use crate::config::PickerConfig;
use crate::event::KeyEvent;
use crate::page::{ElementId, Outline, Page};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerState {
    Idle,
    Picking { highlighted: Option<ElementId> },
}

/// Terminal transition of a picking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerOutcome {
    Selected(ElementId),
    Cancelled,
}

pub struct Picker {
    state: PickerState,
    config: PickerConfig,
    highlight: Outline,
}

impl Picker {
    pub fn new(config: PickerConfig, highlight: Outline) -> Self {
        Self {
            state: PickerState::Idle,
            config,
            highlight,
        }
    }

    pub fn state(&self) -> PickerState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, PickerState::Picking { .. })
    }

    pub fn highlighted(&self) -> Option<ElementId> {
        match self.state {
            PickerState::Picking { highlighted } => highlighted,
            PickerState::Idle => None,
        }
    }

    /// Enter picking mode. Returns false (and does nothing) if already picking.
    pub fn begin<P: Page + ?Sized>(&mut self, page: &mut P) -> bool {
        if self.is_active() {
            debug!("Picker already active");
            return false;
        }
        page.set_picking_cursor(true);
        self.state = PickerState::Picking { highlighted: None };
        true
    }

    /// Hover or focus on `target`. Returns the newly highlighted element.
    pub fn on_pointer<P: Page + ?Sized>(&mut self, page: &mut P, target: ElementId) -> Option<ElementId> {
        let PickerState::Picking { highlighted } = self.state else {
            return None;
        };
        let candidate = interactive_ancestor(page, target, &self.config)?;
        if highlighted == Some(candidate) {
            return None;
        }
        if let Some(previous) = highlighted {
            page.set_outline(previous, None);
        }
        page.set_outline(candidate, Some(&self.highlight));
        page.focus(candidate, true);
        self.state = PickerState::Picking {
            highlighted: Some(candidate),
        };
        Some(candidate)
    }

    /// A click while picking selects; the click must not reach the page.
    pub fn on_click<P: Page + ?Sized>(&mut self, page: &mut P, target: ElementId) -> Option<PickerOutcome> {
        if !self.is_active() {
            return None;
        }
        let chosen = interactive_ancestor(page, target, &self.config)
            .or(self.highlighted())
            .unwrap_or(target);
        self.finish(page);
        Some(PickerOutcome::Selected(chosen))
    }

    /// Enter selects the highlighted (or focused) element, Escape cancels.
    /// Any other key is left to the page so keyboard navigation keeps working.
    pub fn on_key<P: Page + ?Sized>(&mut self, page: &mut P, event: &KeyEvent) -> Option<PickerOutcome> {
        if !self.is_active() {
            return None;
        }
        match event.key.as_str() {
            "Escape" => {
                self.finish(page);
                Some(PickerOutcome::Cancelled)
            }
            "Enter" => {
                let chosen = self.highlighted().or_else(|| {
                    page.active_element()
                        .and_then(|el| interactive_ancestor(page, el, &self.config))
                })?;
                self.finish(page);
                Some(PickerOutcome::Selected(chosen))
            }
            _ => None,
        }
    }

    /// Leave picking mode without a selection (navigation, toggle).
    pub fn cancel<P: Page + ?Sized>(&mut self, page: &mut P) -> bool {
        if !self.is_active() {
            return false;
        }
        self.finish(page);
        true
    }

    fn finish<P: Page + ?Sized>(&mut self, page: &mut P) {
        if let Some(previous) = self.highlighted() {
            page.set_outline(previous, None);
        }
        page.set_picking_cursor(false);
        self.state = PickerState::Idle;
    }
}

/// `element` or its closest ancestor that can be activated.
pub fn interactive_ancestor<P: Page + ?Sized>(
    page: &P,
    element: ElementId,
    config: &PickerConfig,
) -> Option<ElementId> {
    let mut current = Some(element);
    while let Some(el) = current {
        if is_interactive(page, el, config) {
            return Some(el);
        }
        current = page.parent(el);
    }
    None
}

fn is_interactive<P: Page + ?Sized>(page: &P, element: ElementId, config: &PickerConfig) -> bool {
    let Some(tag) = page.tag_name(element) else {
        return false;
    };
    if config.interactive_tags.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
        return true;
    }
    if page.attribute(element, "tabindex").is_some() {
        return true;
    }
    page.attribute(element, "role")
        .is_some_and(|role| config.interactive_roles.iter().any(|r| r.eq_ignore_ascii_case(&role)))
}

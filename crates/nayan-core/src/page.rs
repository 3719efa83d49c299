//! Page Abstraction
//!
//! The page core never touches a concrete DOM. Everything it needs from the
//! document (inspection, selector queries, activation and the feedback
//! surfaces) goes through the [`Page`] trait.
//!
//! Implementations:
//! - [`crate::dom::MemoryPage`]: in-memory document for tests and simulation
//! - A content-script binding that forwards to the live DOM

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Opaque handle to an element, issued by the page.
///
/// Handles are weak: once the element leaves the document, every query on it
/// answers `None`/`false` instead of failing.
pub type ElementId = u32;

/// Outline drawn around an element (picker highlight, activation pulse).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    pub color: String,
    pub width_px: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

/// Transient floating notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub duration: Duration,
    pub fade: Duration,
}

/// Text for the off-screen live region.
///
/// The region is cleared first and the text set again after `delay`, so
/// repeating the same message is still announced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub text: String,
    pub delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCue {
    Success,
    Error,
}

pub trait Page {
    /// URL of the document.
    fn url(&self) -> String;

    /// Lowercase tag name, or `None` if the element is gone.
    fn tag_name(&self, element: ElementId) -> Option<String>;

    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    fn parent(&self, element: ElementId) -> Option<ElementId>;

    /// Element children in document order.
    fn element_children(&self, element: ElementId) -> Vec<ElementId>;

    /// First element matching `selector` in document order.
    /// Invalid selectors match nothing.
    fn query_selector(&self, selector: &str) -> Option<ElementId>;

    fn active_element(&self) -> Option<ElementId>;

    /// Simulate a click. Returns false if the element is gone.
    fn click(&mut self, element: ElementId) -> bool;

    fn focus(&mut self, element: ElementId, prevent_scroll: bool);

    /// Set or clear the persistent outline of an element.
    fn set_outline(&mut self, element: ElementId, outline: Option<&Outline>);

    /// Outline an element for `duration`, then restore it.
    fn pulse(&mut self, element: ElementId, outline: &Outline, duration: Duration);

    /// Switch the picking cursor affordance on or off.
    fn set_picking_cursor(&mut self, active: bool);

    fn announce(&mut self, announcement: &Announcement);

    fn show_toast(&mut self, toast: &Toast);

    fn play_cue(&mut self, _cue: AudioCue) {}

    fn is_connected(&self, element: ElementId) -> bool {
        self.tag_name(element).is_some()
    }
}

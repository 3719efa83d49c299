//! Selector generation for picked elements.
//!
//! Attribute-based selectors are preferred because they survive re-renders
//! and re-ordering; the structural `tag:nth-child(n)` form is the last resort.

use crate::page::{ElementId, Page};
use regex::Regex;
use std::sync::LazyLock;

/// Runs typical of framework-generated IDs (e.g. `ember-X7Q9Z2`).
static GENERATED_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Z0-9]{5,}").unwrap());

/// Attributes tried in order on the element itself after its parent's label.
const LABEL_ATTRIBUTES: [&str; 2] = ["title", "alt"];

/// Derive a selector that finds `element` again later.
///
/// Returns `None` only when the element is no longer in the document.
pub fn generate_selector<P: Page + ?Sized>(page: &P, element: ElementId) -> Option<String> {
    let tag = page.tag_name(element)?;

    if let Some(label) = non_blank(page.attribute(element, "aria-label")) {
        return Some(attribute_selector("aria-label", &label));
    }

    // Icon children: the clickable wrapper carries the label.
    if let Some(label) = page
        .parent(element)
        .and_then(|parent| non_blank(page.attribute(parent, "aria-label")))
    {
        return Some(attribute_selector("aria-label", &label));
    }

    for name in LABEL_ATTRIBUTES {
        if let Some(value) = non_blank(page.attribute(element, name)) {
            return Some(attribute_selector(name, &value));
        }
    }

    if let Some(id) = non_blank(page.attribute(element, "id"))
        && !looks_generated(&id)
    {
        return Some(format!("#{}", escape_identifier(&id)));
    }

    Some(structural_selector(page, element, &tag))
}

/// True for IDs that look machine-generated and are unlikely to be stable.
pub fn looks_generated(id: &str) -> bool {
    GENERATED_ID.is_match(id)
}

/// `[name="value"]` as a quoted CSS string. Control characters become hex
/// escapes, `\a ` for a newline.
pub fn attribute_selector(name: &str, value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\0' => escaped.push('\u{FFFD}'),
            '"' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            c if c.is_ascii_control() => escaped.push_str(&format!("\\{:x} ", c as u32)),
            c => escaped.push(c),
        }
    }
    format!("[{}=\"{}\"]", name, escaped)
}

/// CSS identifier escaping for `#id` selectors.
pub fn escape_identifier(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    for (i, c) in ident.chars().enumerate() {
        if i == 0 && c.is_ascii_digit() {
            out.push_str(&format!("\\{:x} ", c as u32));
        } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }
    out
}

fn structural_selector<P: Page + ?Sized>(page: &P, element: ElementId, tag: &str) -> String {
    let position = page.parent(element).and_then(|parent| {
        page.element_children(parent)
            .iter()
            .position(|&child| child == element)
    });
    match position {
        Some(index) => format!("{}:nth-child({})", tag, index + 1),
        None => tag.to_string(),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

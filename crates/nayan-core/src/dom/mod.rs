//! In-memory document implementing [`Page`].
//!
//! Backed by a parsed [`scraper::Html`] tree, so selectors resolve with real
//! CSS semantics. Used by the integration tests and by the offline simulator.
//! Every effect the page core requests (clicks, focus moves, outlines,
//! announcements, toasts) is recorded as a [`PageEffect`] so callers can
//! inspect it.

use crate::page::{Announcement, AudioCue, ElementId, Outline, Page, Toast};
use ego_tree::{NodeId, NodeRef};
use scraper::{ElementRef, Html, Node, Selector};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::debug;

/// Tags the HTML parser only accepts inside a table.
const TABLE_PARTS: [&str; 9] = [
    "caption", "colgroup", "col", "tbody", "thead", "tfoot", "tr", "td", "th",
];

/// Declarative description of an element subtree (fixture format).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub tag: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }
}

/// A fixture page: URL plus body contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpec {
    pub url: String,
    #[serde(default)]
    pub body: Vec<NodeSpec>,
}

/// Side effects observed on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEffect {
    Clicked(ElementId),
    Focused {
        element: ElementId,
        prevent_scroll: bool,
    },
    Outlined {
        element: ElementId,
        outline: Option<Outline>,
    },
    Pulsed {
        element: ElementId,
        outline: Outline,
        duration: Duration,
    },
    PickingCursor(bool),
    Announced(String),
    Toast(Toast),
    Cue(AudioCue),
}

#[derive(Debug, Clone)]
pub struct MemoryPage {
    url: String,
    document: Html,
    body: ElementId,
    /// Handle -> tree node. `None` for elements that could not be created.
    nodes: Vec<Option<NodeId>>,
    handles: HashMap<NodeId, ElementId>,
    active: Option<ElementId>,
    outlines: HashMap<ElementId, Outline>,
    picking_cursor: bool,
    effects: Vec<PageEffect>,
}

impl MemoryPage {
    /// Empty document (`html`, `head`, `body`).
    pub fn new(url: impl Into<String>) -> Self {
        Self::from_html(url, "")
    }

    /// Parse a whole HTML document.
    pub fn from_html(url: impl Into<String>, html: &str) -> Self {
        let document = Html::parse_document(html);
        let elements: Vec<NodeId> = document
            .root_element()
            .descendants()
            .filter(|node| node.value().is_element())
            .map(|node| node.id())
            .collect();
        let mut page = Self {
            url: url.into(),
            document,
            body: 0,
            nodes: Vec::new(),
            handles: HashMap::new(),
            active: None,
            outlines: HashMap::new(),
            picking_cursor: false,
            effects: Vec::new(),
        };
        for node in elements {
            page.register(Some(node));
        }
        let body = page
            .document
            .root_element()
            .children()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "body")
            .and_then(|el| page.handle_of(el));
        if let Some(body) = body {
            page.body = body;
        }
        page
    }

    pub fn from_spec(spec: &PageSpec) -> Self {
        let mut page = Self::new(spec.url.clone());
        let body = page.body();
        for node in &spec.body {
            page.append_spec(body, node);
        }
        page
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Append a new element under `parent` and return its handle.
    ///
    /// The handle resolves to nothing if `parent` is unknown or the tag cannot
    /// be parsed.
    pub fn append(&mut self, parent: ElementId, tag: &str, attributes: &[(&str, &str)]) -> ElementId {
        let node = match (self.node_id(parent), element_node(tag, attributes)) {
            (Some(parent), Some(value)) => self
                .document
                .tree
                .get_mut(parent)
                .map(|mut p| p.append(value).id()),
            _ => None,
        };
        if node.is_none() {
            debug!("Could not create <{}> under element {}", tag, parent);
        }
        self.register(node)
    }

    pub fn append_spec(&mut self, parent: ElementId, spec: &NodeSpec) -> ElementId {
        let attrs: Vec<(&str, &str)> = spec
            .attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let id = self.append(parent, &spec.tag, &attrs);
        for child in &spec.children {
            self.append_spec(id, child);
        }
        id
    }

    /// Detach an element and its subtree from the document.
    /// The body and the root element stay.
    pub fn remove(&mut self, element: ElementId) {
        if element == self.body {
            return;
        }
        let Some(node) = self.node_id(element) else {
            return;
        };
        let root = self.document.tree.root().id();
        let Some(subtree) = self.document.tree.get(node).and_then(|n| {
            let is_root_element = n.parent().is_some_and(|p| p.id() == root);
            (!is_root_element).then(|| n.descendants().map(|d| d.id()).collect::<Vec<_>>())
        }) else {
            return;
        };
        if let Some(mut n) = self.document.tree.get_mut(node) {
            n.detach();
        }
        for id in subtree {
            if let Some(&handle) = self.handles.get(&id) {
                self.outlines.remove(&handle);
                if self.active == Some(handle) {
                    self.active = None;
                }
            }
        }
    }

    pub fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        let Some(node) = self.node_id(element) else {
            return;
        };
        let Some(current) = self.document.tree.get(node).and_then(|n| n.value().as_element()) else {
            return;
        };
        let name = name.to_ascii_lowercase();
        let tag = current.name().to_string();
        let mut attributes: Vec<(String, String)> = current
            .attrs()
            .filter(|(k, _)| *k != name)
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        attributes.push((name, value.to_string()));
        let pairs: Vec<(&str, &str)> = attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        if let Some(replacement) = element_node(&tag, &pairs)
            && let Some(mut target) = self.document.tree.get_mut(node)
        {
            *target.value() = replacement;
        }
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    /// Current persistent outline of an element.
    pub fn outline(&self, element: ElementId) -> Option<&Outline> {
        self.outlines.get(&element)
    }

    pub fn picking_cursor(&self) -> bool {
        self.picking_cursor
    }

    pub fn effects(&self) -> &[PageEffect] {
        &self.effects
    }

    pub fn take_effects(&mut self) -> Vec<PageEffect> {
        std::mem::take(&mut self.effects)
    }

    pub fn announcements(&self) -> Vec<&str> {
        self.effects
            .iter()
            .filter_map(|e| match e {
                PageEffect::Announced(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clicks(&self) -> Vec<ElementId> {
        self.effects
            .iter()
            .filter_map(|e| match e {
                PageEffect::Clicked(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn toasts(&self) -> Vec<&Toast> {
        self.effects
            .iter()
            .filter_map(|e| match e {
                PageEffect::Toast(toast) => Some(toast),
                _ => None,
            })
            .collect()
    }

    /// Every element matching `selector`, in document order, the root
    /// element included.
    pub fn query_selector_all(&self, selector: &str) -> Vec<ElementId> {
        let parsed = match Selector::parse(selector) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("Invalid selector {:?}: {:?}", selector, e);
                return Vec::new();
            }
        };
        let root = self.document.root_element();
        std::iter::once(root)
            .filter(|el| parsed.matches(el))
            .chain(root.select(&parsed))
            .filter_map(|el| self.handle_of(el))
            .collect()
    }

    fn register(&mut self, node: Option<NodeId>) -> ElementId {
        let handle = self.nodes.len() as ElementId;
        self.nodes.push(node);
        if let Some(node) = node {
            self.handles.insert(node, handle);
        }
        handle
    }

    fn node_id(&self, element: ElementId) -> Option<NodeId> {
        self.nodes.get(element as usize).copied().flatten()
    }

    fn handle_of(&self, element: ElementRef<'_>) -> Option<ElementId> {
        let node: NodeRef<'_, Node> = *element;
        self.handles.get(&node.id()).copied()
    }

    /// The element behind `element`, if it is still in the document.
    fn element(&self, element: ElementId) -> Option<ElementRef<'_>> {
        let node = self.document.tree.get(self.node_id(element)?)?;
        let root = self.document.tree.root().id();
        if !node.ancestors().any(|a| a.id() == root) {
            return None;
        }
        ElementRef::wrap(node)
    }
}

/// Build a detached element node by letting the HTML parser read its start tag.
fn element_node(tag: &str, attributes: &[(&str, &str)]) -> Option<Node> {
    let tag = tag.trim().to_ascii_lowercase();
    if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return None;
    }
    let mut markup = format!("<{}", tag);
    for (name, value) in attributes {
        if name.is_empty() || name.chars().any(|c| c.is_whitespace() || "\"'<>/=".contains(c)) {
            continue;
        }
        markup.push_str(&format!(" {}=\"{}\"", name, escape_attribute_value(value)));
    }
    markup.push('>');
    if TABLE_PARTS.contains(&tag.as_str()) {
        markup = format!("<template>{}</template>", markup);
    }
    let fragment = Html::parse_fragment(&markup);
    fragment
        .tree
        .nodes()
        .find(|node| {
            node.value()
                .as_element()
                .is_some_and(|el| el.name().eq_ignore_ascii_case(&tag))
        })
        .map(|node| node.value().clone())
}

fn escape_attribute_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

impl Page for MemoryPage {
    fn url(&self) -> String {
        self.url.clone()
    }

    fn tag_name(&self, element: ElementId) -> Option<String> {
        self.element(element)
            .map(|el| el.value().name().to_ascii_lowercase())
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.element(element)
            .and_then(|el| el.value().attr(&name.to_ascii_lowercase()).map(str::to_string))
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        let parent = self.element(element)?.parent()?;
        ElementRef::wrap(parent).and_then(|el| self.handle_of(el))
    }

    fn element_children(&self, element: ElementId) -> Vec<ElementId> {
        self.element(element)
            .map(|el| {
                el.children()
                    .filter_map(ElementRef::wrap)
                    .filter_map(|child| self.handle_of(child))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn query_selector(&self, selector: &str) -> Option<ElementId> {
        self.query_selector_all(selector).into_iter().next()
    }

    fn active_element(&self) -> Option<ElementId> {
        self.active.filter(|&id| self.element(id).is_some())
    }

    fn click(&mut self, element: ElementId) -> bool {
        if self.element(element).is_none() {
            return false;
        }
        self.effects.push(PageEffect::Clicked(element));
        true
    }

    fn focus(&mut self, element: ElementId, prevent_scroll: bool) {
        if self.element(element).is_none() {
            return;
        }
        self.active = Some(element);
        self.effects.push(PageEffect::Focused {
            element,
            prevent_scroll,
        });
    }

    fn set_outline(&mut self, element: ElementId, outline: Option<&Outline>) {
        match outline {
            Some(o) if self.element(element).is_some() => {
                self.outlines.insert(element, o.clone());
            }
            Some(_) => return,
            None => {
                self.outlines.remove(&element);
            }
        }
        self.effects.push(PageEffect::Outlined {
            element,
            outline: outline.cloned(),
        });
    }

    fn pulse(&mut self, element: ElementId, outline: &Outline, duration: Duration) {
        if self.element(element).is_none() {
            return;
        }
        self.effects.push(PageEffect::Pulsed {
            element,
            outline: outline.clone(),
            duration,
        });
    }

    fn set_picking_cursor(&mut self, active: bool) {
        self.picking_cursor = active;
        self.effects.push(PageEffect::PickingCursor(active));
    }

    fn announce(&mut self, announcement: &Announcement) {
        self.effects
            .push(PageEffect::Announced(announcement.text.clone()));
    }

    fn show_toast(&mut self, toast: &Toast) {
        self.effects.push(PageEffect::Toast(toast.clone()));
    }

    fn play_cue(&mut self, cue: AudioCue) {
        self.effects.push(PageEffect::Cue(cue));
    }
}

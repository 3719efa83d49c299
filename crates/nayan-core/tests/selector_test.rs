use nayan_core::dom::MemoryPage;
use nayan_core::page::{ElementId, Page};
use nayan_core::selector::generate_selector;

fn page() -> MemoryPage {
    MemoryPage::new("https://example.com/")
}

/// Generate a selector for `element` and resolve it again.
fn round_trip(page: &MemoryPage, element: ElementId) -> (String, Option<ElementId>) {
    let selector = generate_selector(page, element).unwrap();
    let found = page.query_selector(&selector);
    (selector, found)
}

#[test]
fn test_own_aria_label_wins() {
    let mut page = page();
    let body = page.body();
    let button = page.append(
        body,
        "button",
        &[("aria-label", "Play"), ("title", "Start"), ("id", "play")],
    );

    assert_eq!(round_trip(&page, button), (r#"[aria-label="Play"]"#.to_string(), Some(button)));
}

#[test]
fn test_icon_uses_parent_label() {
    let mut page = page();
    let body = page.body();
    let link = page.append(body, "a", &[("aria-label", "Home"), ("href", "/")]);
    let icon = page.append(link, "svg", &[]);

    // The selector lands on the labelled wrapper, which is what gets clicked.
    assert_eq!(round_trip(&page, icon), (r#"[aria-label="Home"]"#.to_string(), Some(link)));
}

#[test]
fn test_title_shadows_alt_and_id() {
    let mut page = page();
    let body = page.body();
    let button = page.append(
        body,
        "button",
        &[("title", "Save"), ("alt", "Disk"), ("id", "save")],
    );

    assert_eq!(round_trip(&page, button), (r#"[title="Save"]"#.to_string(), Some(button)));
}

#[test]
fn test_alt_shadows_id() {
    let mut page = page();
    let body = page.body();
    let logo = page.append(body, "img", &[("alt", "Logo"), ("id", "logo")]);

    assert_eq!(round_trip(&page, logo), (r#"[alt="Logo"]"#.to_string(), Some(logo)));
}

#[test]
fn test_blank_labels_are_skipped() {
    let mut page = page();
    let body = page.body();
    let button = page.append(body, "button", &[("aria-label", "  "), ("title", ""), ("id", "go")]);

    assert_eq!(round_trip(&page, button), ("#go".to_string(), Some(button)));
}

#[test]
fn test_stable_id() {
    let mut page = page();
    let body = page.body();
    let form = page.append(body, "form", &[]);
    let submit = page.append(form, "button", &[("id", "submit")]);

    assert_eq!(round_trip(&page, submit), ("#submit".to_string(), Some(submit)));
}

#[test]
fn test_id_needing_escapes() {
    let mut page = page();
    let body = page.body();
    let item = page.append(body, "li", &[("id", "1st.item")]);

    assert_eq!(round_trip(&page, item), (r"#\31 st\.item".to_string(), Some(item)));
}

#[test]
fn test_generated_id_falls_back_to_position() {
    let mut page = page();
    let body = page.body();
    for _ in 0..4 {
        page.append(body, "div", &[]);
    }
    let button = page.append(body, "button", &[("id", "ember-X7Q9Z2")]);

    assert_eq!(round_trip(&page, button), ("button:nth-child(5)".to_string(), Some(button)));
}

#[test]
fn test_multiline_title_round_trips() {
    let mut page = page();
    let body = page.body();
    let button = page.append(body, "button", &[("title", "Save\nall \"files\"")]);

    assert_eq!(
        round_trip(&page, button),
        (r#"[title="Save\a all \"files\""]"#.to_string(), Some(button))
    );
}

#[test]
fn test_document_root_and_body() {
    let page = page();
    let body = page.body();
    let root = page.parent(body).unwrap();

    // The root element has no parent element to count a position in.
    assert_eq!(round_trip(&page, root), ("html".to_string(), Some(root)));
    assert_eq!(round_trip(&page, body), ("body:nth-child(2)".to_string(), Some(body)));
}

#[test]
fn test_detached_element_has_no_selector() {
    let mut page = page();
    let body = page.body();
    let panel = page.append(body, "div", &[]);
    let button = page.append(panel, "button", &[("id", "close")]);
    page.remove(panel);

    assert_eq!(generate_selector(&page, button), None);
}

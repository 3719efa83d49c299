use nayan_core::binding::ShortcutTable;
use nayan_core::combo::ComboToken;
use nayan_core::config::NayanConfig;
use nayan_core::dom::{MemoryPage, PageEffect};
use nayan_core::event::{KeyEvent, PageEvent};
use nayan_core::locale::Language;
use nayan_core::page::{AudioCue, ElementId, Outline, ToastKind};
use nayan_core::protocol::{HostNotification, PageCommand};
use nayan_core::session::{Mode, PageSession};
use nayan_core::store::{self, KeyValueStore, MemoryStore};
use nayan_core::storage::StoredValue;
use std::time::Duration;

const DOMAIN: &str = "example.com";

fn combo(s: &str) -> ComboToken {
    ComboToken::parse(s).unwrap()
}

fn table(rows: &[(&str, &str)]) -> ShortcutTable {
    let mut table = ShortcutTable::new();
    for (selector, c) in rows {
        table.upsert(selector, combo(c)).unwrap();
    }
    table
}

struct Fixture {
    page: MemoryPage,
    submit: ElementId,
    play: ElementId,
    play_icon: ElementId,
    search: ElementId,
}

fn fixture(url: &str) -> Fixture {
    let mut page = MemoryPage::new(url);
    let body = page.body();
    let form = page.append(body, "form", &[]);
    let search = page.append(form, "input", &[("type", "text"), ("name", "q")]);
    let submit = page.append(form, "button", &[("id", "submit")]);
    let player = page.append(body, "div", &[("class", "player")]);
    let play = page.append(player, "button", &[("aria-label", "Play")]);
    let play_icon = page.append(play, "svg", &[]);
    Fixture {
        page,
        submit,
        play,
        play_icon,
        search,
    }
}

async fn session_with(
    rows: &[(&str, &str)],
) -> (PageSession<MemoryPage, MemoryStore>, MemoryStore, Fixture) {
    let store = MemoryStore::new();
    if !rows.is_empty() {
        store::save_table(&store, DOMAIN, &table(rows)).await.unwrap();
    }
    let f = fixture("https://example.com/watch");
    let session = PageSession::start(f.page.clone(), store.clone(), NayanConfig::default()).await;
    (session, store, f)
}

fn key(event: KeyEvent) -> PageEvent {
    PageEvent::KeyDown(event)
}

#[tokio::test]
async fn test_unbound_combo_passes_through() {
    let (mut session, _store, _f) = session_with(&[]).await;
    assert_eq!(session.domain(), Some(DOMAIN));

    let outcome = session
        .handle_event(key(KeyEvent::new("U").ctrl().shift()))
        .await;

    assert!(!outcome.suppress);
    assert!(outcome.notification.is_none());
    assert!(session.page().effects().is_empty());
}

#[tokio::test]
async fn test_bound_combo_activates_element() {
    let (mut session, _store, f) = session_with(&[("#submit", "Shift+S")]).await;
    assert_eq!(session.table().len(), 1);

    let outcome = session.handle_event(key(KeyEvent::new("S").shift())).await;

    assert!(outcome.suppress);
    assert_eq!(
        outcome.notification,
        Some(HostNotification::ShortcutPress {
            key: combo("Shift+S")
        })
    );
    let effects = session.page().effects();
    assert_eq!(effects[0], PageEffect::Clicked(f.submit));
    assert_eq!(
        effects[1],
        PageEffect::Focused {
            element: f.submit,
            prevent_scroll: false
        }
    );
    assert_eq!(
        effects[2],
        PageEffect::Pulsed {
            element: f.submit,
            outline: Outline {
                color: "#00e676".to_string(),
                width_px: 3
            },
            duration: Duration::from_millis(200),
        }
    );
    assert_eq!(session.page().announcements(), vec!["Clicked"]);
}

#[tokio::test]
async fn test_lowercase_key_with_shift_matches() {
    let (mut session, _store, f) = session_with(&[("#submit", "Shift+S")]).await;

    let outcome = session.handle_event(key(KeyEvent::new("s").shift())).await;

    assert!(outcome.suppress);
    assert_eq!(session.page().clicks(), vec![f.submit]);
}

#[tokio::test]
async fn test_bound_element_missing_announces_not_found() {
    let (mut session, _store, f) = session_with(&[("#submit", "Shift+S")]).await;
    session.page_mut().remove(f.submit);

    let outcome = session.handle_event(key(KeyEvent::new("S").shift())).await;

    assert!(outcome.suppress);
    assert!(outcome.notification.is_none());
    assert!(session.page().clicks().is_empty());
    assert_eq!(
        session.page().announcements(),
        vec!["Button not found on this page"]
    );
}

#[tokio::test]
async fn test_typing_in_text_field_is_not_intercepted() {
    let (mut session, _store, f) = session_with(&[("#submit", "S")]).await;

    let outcome = session
        .handle_event(key(KeyEvent::new("s").on(f.search)))
        .await;

    assert!(!outcome.suppress);
    assert!(session.page().clicks().is_empty());
}

#[tokio::test]
async fn test_contenteditable_ancestor_counts_as_typing() {
    let (mut session, _store, _f) = session_with(&[("#submit", "S")]).await;
    let page = session.page_mut();
    let body = page.body();
    let editor = page.append(body, "div", &[("contenteditable", "true")]);
    let line = page.append(editor, "p", &[]);

    let outcome = session.handle_event(key(KeyEvent::new("s").on(line))).await;

    assert!(!outcome.suppress);
    assert!(session.page().clicks().is_empty());
}

#[tokio::test]
async fn test_pick_then_record_binds_shortcut() {
    let (mut session, store, f) = session_with(&[]).await;

    session.handle_command(PageCommand::TogglePicker);
    assert_eq!(session.mode(), Mode::Picking);
    assert!(session.page().picking_cursor());

    let hover = session
        .handle_event(PageEvent::PointerOver {
            target: f.play_icon,
        })
        .await;
    assert!(!hover.suppress);
    assert!(session.page().outline(f.play).is_some());

    let enter = session.handle_event(key(KeyEvent::new("Enter"))).await;
    assert!(enter.suppress);
    assert_eq!(session.mode(), Mode::Recording);
    assert!(!session.page().picking_cursor());
    assert!(session.page().outline(f.play).is_none());
    assert_eq!(
        session.recording().map(|r| r.selector.as_str()),
        Some(r#"[aria-label="Play"]"#)
    );

    // Bare modifiers keep waiting.
    let shift = session.handle_event(key(KeyEvent::new("Shift").shift())).await;
    assert!(shift.suppress);
    assert_eq!(session.mode(), Mode::Recording);

    let saved = session.handle_event(key(KeyEvent::new("k"))).await;
    assert!(saved.suppress);
    assert_eq!(session.mode(), Mode::Idle);

    let stored = store::load_table(&store, DOMAIN).await.unwrap();
    assert_eq!(
        stored.find_by_combo(&combo("K")).map(|b| b.selector.as_str()),
        Some(r#"[aria-label="Play"]"#)
    );
    assert_eq!(session.table(), &stored);

    let page = session.page();
    let announcements = page.announcements();
    assert_eq!(
        announcements,
        vec![
            "Picker Mode On. Click any button on the page.",
            "Button selected. Now press your desired shortcut keys.",
            "Key Saved: K",
        ]
    );
    assert!(page.effects().contains(&PageEffect::Cue(AudioCue::Success)));
    assert_eq!(page.toasts().last().map(|t| t.kind), Some(ToastKind::Success));

    // The new binding is live right away.
    session.page_mut().take_effects();
    let pressed = session.handle_event(key(KeyEvent::new("k"))).await;
    assert!(pressed.suppress);
    assert_eq!(session.page().clicks(), vec![f.play]);
}

#[tokio::test]
async fn test_invalid_key_keeps_recording() {
    let (mut session, store, f) = session_with(&[]).await;
    session.begin_picking();
    session.handle_event(PageEvent::Click { target: f.play }).await;
    assert_eq!(session.mode(), Mode::Recording);

    let slash = session.handle_event(key(KeyEvent::new("/"))).await;

    assert!(slash.suppress);
    assert_eq!(session.mode(), Mode::Recording);
    assert_eq!(
        session.page().announcements().last().copied(),
        Some("Please use letters or numbers only")
    );
    assert!(session.page().effects().contains(&PageEffect::Cue(AudioCue::Error)));
    assert!(store.keys().await.unwrap().is_empty());

    session.handle_event(key(KeyEvent::new("7").alt())).await;
    assert_eq!(session.mode(), Mode::Idle);
    assert!(session.table().find_by_combo(&combo("Alt+7")).is_some());
}

#[tokio::test]
async fn test_conflicting_combo_is_rejected() {
    let (mut session, store, f) = session_with(&[("#submit", "K")]).await;
    let before = store::load_table(&store, DOMAIN).await.unwrap();

    session.begin_picking();
    session.handle_event(PageEvent::Click { target: f.play }).await;
    session.handle_event(key(KeyEvent::new("k"))).await;

    assert_eq!(store::load_table(&store, DOMAIN).await.unwrap(), before);
    assert_eq!(session.mode(), Mode::Recording);
    assert_eq!(
        session.page().announcements().last().copied(),
        Some("Key already used for this site!")
    );

    // Another key still works.
    session.handle_event(key(KeyEvent::new("p"))).await;
    let after = store::load_table(&store, DOMAIN).await.unwrap();
    assert_eq!(after.len(), 2);
    assert_eq!(
        after.find_by_combo(&combo("P")).map(|b| b.selector.as_str()),
        Some(r#"[aria-label="Play"]"#)
    );
}

#[tokio::test]
async fn test_rebinding_same_element_replaces_combo() {
    let (mut session, store, f) = session_with(&[("#submit", "S")]).await;

    session.begin_picking();
    session.handle_event(PageEvent::Click { target: f.submit }).await;
    session.handle_event(key(KeyEvent::new("x").ctrl())).await;

    let stored = store::load_table(&store, DOMAIN).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(
        stored.find_by_selector("#submit").map(|b| b.combo.as_str()),
        Some("Ctrl+X")
    );
}

#[tokio::test]
async fn test_escape_cancels_recording() {
    let (mut session, store, f) = session_with(&[]).await;
    session.begin_picking();
    session.handle_event(PageEvent::Click { target: f.play }).await;

    let escape = session.handle_event(key(KeyEvent::new("Escape"))).await;

    assert!(escape.suppress);
    assert_eq!(session.mode(), Mode::Idle);
    assert_eq!(
        session.page().announcements().last().copied(),
        Some("Recording cancelled")
    );
    assert!(store.keys().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_recording_picks_up_edits_made_elsewhere() {
    let (mut session, store, f) = session_with(&[]).await;
    session.begin_picking();
    session.handle_event(PageEvent::Click { target: f.play }).await;

    // Written by another page of the same site while recording.
    store::save_table(&store, DOMAIN, &table(&[("#submit", "S")]))
        .await
        .unwrap();
    session.handle_event(key(KeyEvent::new("p"))).await;

    let stored = store::load_table(&store, DOMAIN).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.find_by_selector("#submit").is_some());
}

#[tokio::test]
async fn test_storage_change_updates_cached_table() {
    let (mut session, store, f) = session_with(&[]).await;
    let mut changes = session.subscribe();

    store::save_table(&store, DOMAIN, &table(&[("#submit", "Alt+1")]))
        .await
        .unwrap();
    store::save_table(&store, "other.org", &table(&[("#x", "Alt+2")]))
        .await
        .unwrap();
    while let Ok(change) = changes.try_recv() {
        session.apply_storage_change(&change);
    }

    assert_eq!(session.table().len(), 1);
    assert!(session.table().find_by_combo(&combo("Alt+2")).is_none());
    session.handle_event(key(KeyEvent::new("1").alt())).await;
    assert_eq!(session.page().clicks(), vec![f.submit]);

    store.remove(DOMAIN).await.unwrap();
    while let Ok(change) = changes.try_recv() {
        session.apply_storage_change(&change);
    }
    assert!(session.table().is_empty());
}

#[tokio::test]
async fn test_language_preference_is_loaded_and_followed() {
    let store = MemoryStore::new();
    store::save_language(&store, Language::Mr).await.unwrap();
    let f = fixture("https://example.com/");
    let mut session = PageSession::start(f.page, store.clone(), NayanConfig::default()).await;
    assert_eq!(session.language(), Language::Mr);

    let mut changes = session.subscribe();
    store::save_language(&store, Language::Hi).await.unwrap();
    while let Ok(change) = changes.try_recv() {
        session.apply_storage_change(&change);
    }
    assert_eq!(session.language(), Language::Hi);

    session.begin_picking();
    assert_eq!(
        session.page().announcements(),
        vec!["पिकर मोड चालू। पेज पर किसी भी बटन पर क्लिक करें।"]
    );
}

#[tokio::test]
async fn test_change_language_command() {
    let (mut session, _store, _f) = session_with(&[]).await;

    session.handle_command(PageCommand::ChangeLanguage {
        language: "mr".to_string(),
    });

    assert_eq!(session.language(), Language::Mr);
    assert_eq!(session.page().announcements(), vec!["भाषा मराठीत बदलली"]);
}

#[tokio::test]
async fn test_trigger_toast_command() {
    let (mut session, _store, _f) = session_with(&[]).await;

    session.handle_command(PageCommand::TriggerToast {
        message: "Nayan Deep Extension is active!".to_string(),
    });

    let toasts = session.page().toasts();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].message, "Nayan Deep Extension is active!");
    assert_eq!(toasts[0].kind, ToastKind::Info);
    assert_eq!(toasts[0].duration, Duration::from_millis(3000));
}

#[tokio::test]
async fn test_invalidated_context_turns_session_inert() {
    let (mut session, store, _f) = session_with(&[("#submit", "Shift+S")]).await;
    store.invalidate();

    let outcome = session.handle_event(key(KeyEvent::new("S").shift())).await;
    session.handle_command(PageCommand::TogglePicker);

    assert!(session.is_invalidated());
    assert!(!outcome.suppress);
    assert_eq!(session.mode(), Mode::Idle);
    assert!(session.page().effects().is_empty());
}

#[tokio::test]
async fn test_invalidation_during_recording_drops_it() {
    let (mut session, store, f) = session_with(&[]).await;
    session.begin_picking();
    session.handle_event(PageEvent::Click { target: f.play }).await;
    store.invalidate();

    let outcome = session.handle_event(key(KeyEvent::new("k"))).await;

    assert!(!outcome.suppress);
    assert!(session.is_invalidated());
    assert!(session.recording().is_none());
}

#[tokio::test]
async fn test_internal_pages_are_inert() {
    let store = MemoryStore::new();
    let f = fixture("chrome://settings");
    let mut session = PageSession::start(f.page, store, NayanConfig::default()).await;

    assert_eq!(session.domain(), None);
    assert!(!session.begin_picking());
    let outcome = session.handle_event(key(KeyEvent::new("S").shift())).await;
    assert!(!outcome.suppress);
    assert!(session.page().effects().is_empty());
}

#[tokio::test]
async fn test_navigate_loads_new_domain() {
    let store = MemoryStore::new();
    store::save_table(&store, "other.org", &table(&[("#go", "G")]))
        .await
        .unwrap();
    let f = fixture("https://example.com/");
    let mut session = PageSession::start(f.page, store, NayanConfig::default()).await;
    session.begin_picking();

    let mut next = MemoryPage::new("https://other.org/home");
    let body = next.body();
    let go = next.append(body, "a", &[("id", "go"), ("href", "/go")]);
    session.navigate(next).await;

    assert_eq!(session.domain(), Some("other.org"));
    assert_eq!(session.mode(), Mode::Idle);
    session.handle_event(key(KeyEvent::new("g"))).await;
    assert_eq!(session.page().clicks(), vec![go]);
}

#[tokio::test]
async fn test_legacy_rows_are_honored() {
    let store = MemoryStore::new();
    let legacy: ShortcutTable =
        serde_json::from_str(r##"[{"id": "#submit", "key": "Shift+S"}, {"id": "", "key": "X"}]"##)
            .unwrap();
    store
        .set(DOMAIN, StoredValue::Bindings(legacy))
        .await
        .unwrap();
    let f = fixture("https://example.com/");
    let submit = f.submit;
    let mut session = PageSession::start(f.page, store, NayanConfig::default()).await;

    assert_eq!(session.table().len(), 1);
    session.handle_event(key(KeyEvent::new("S").shift())).await;
    assert_eq!(session.page().clicks(), vec![submit]);
}

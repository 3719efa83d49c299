use nayan_core::config::NayanConfig;
use nayan_core::dom::{MemoryPage, NodeSpec, PageSpec};
use nayan_core::session::Mode;
use nayan_core::store::{self, MemoryStore};
use nayan_engine::fixture;
use nayan_engine::simulator::{Simulator, SimulatorError};
use std::io::Write;

fn player_page() -> MemoryPage {
    MemoryPage::from_spec(&PageSpec {
        url: "https://www.youtube.com/watch?v=1".to_string(),
        body: vec![
            NodeSpec::new("div")
                .attr("id", "movie_player")
                .child(
                    NodeSpec::new("button")
                        .attr("class", "ytp-play-button")
                        .attr("aria-label", "Play (k)"),
                )
                .child(NodeSpec::new("input").attr("id", "search")),
        ],
    })
}

#[tokio::test]
async fn test_record_and_use_shortcut() {
    let store = MemoryStore::new();
    let mut sim = Simulator::new(player_page(), store.clone(), NayanConfig::default()).await;

    let out = sim.execute_line("pick").await.unwrap();
    assert!(out.contains("cursor: crosshair"));
    assert!(out.contains("announce: Picker Mode On"));

    let out = sim.execute_line("hover .ytp-play-button").await.unwrap();
    assert!(out.contains(r#"outlined [aria-label="Play (k)"] (#ffd600)"#));

    sim.execute_line("press enter").await.unwrap();
    assert_eq!(sim.session().mode(), Mode::Recording);

    let out = sim.execute_line("press /").await.unwrap();
    assert!(out.contains("toast [error]: Please use letters or numbers only"));

    let out = sim.execute_line("press k").await.unwrap();
    assert!(out.contains("announce: Key Saved: K"));
    assert_eq!(sim.session().mode(), Mode::Idle);

    let out = sim.execute_line("table").await.unwrap();
    assert!(out.contains(r#"[aria-label="Play (k)"]"#));

    let out = sim.execute_line("press k").await.unwrap();
    assert!(out.contains(r#"clicked [aria-label="Play (k)"]"#));
    assert!(out.contains(r#"notify: {"type":"shortcutPress","key":"K"}"#));

    let out = sim.execute_line("press k in #search").await.unwrap();
    assert!(!out.contains("clicked"));

    let stored = store::load_table(&store, "www.youtube.com").await.unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_removed_element_is_reported() {
    let store = MemoryStore::new();
    let mut sim = Simulator::new(player_page(), store, NayanConfig::default()).await;
    sim.execute_line("pick").await.unwrap();
    sim.execute_line("click .ytp-play-button").await.unwrap();
    sim.execute_line("press alt+p").await.unwrap();

    sim.execute_line("remove .ytp-play-button").await.unwrap();
    let out = sim.execute_line("press alt+p").await.unwrap();

    assert!(out.contains("announce: Button not found on this page"));
}

#[tokio::test]
async fn test_external_edits_are_applied() {
    let store = MemoryStore::new();
    let mut sim = Simulator::new(player_page(), store.clone(), NayanConfig::default()).await;

    let settings = nayan_core::settings::Settings::new(store);
    settings
        .bind("www.youtube.com", "#movie_player button", "ctrl+shift+p")
        .await
        .unwrap();

    let out = sim.execute_line("press ctrl+shift+p").await.unwrap();
    assert!(out.contains("clicked"));
}

#[tokio::test]
async fn test_bad_commands() {
    let mut sim = Simulator::new(player_page(), MemoryStore::new(), NayanConfig::default()).await;

    assert!(matches!(
        sim.execute_line("jump").await,
        Err(SimulatorError::UnknownCommand(_))
    ));
    assert!(matches!(
        sim.execute_line("hover #nope").await,
        Err(SimulatorError::ElementNotFound(_))
    ));
    assert!(matches!(
        sim.execute_line("press ctrl+").await,
        Err(SimulatorError::Combo(_))
    ));
    assert!(matches!(
        sim.execute_line("press").await,
        Err(SimulatorError::Usage(_))
    ));
}

#[tokio::test]
async fn test_language_and_toast() {
    let mut sim = Simulator::new(player_page(), MemoryStore::new(), NayanConfig::default()).await;

    let out = sim.execute_line("lang hi").await.unwrap();
    assert!(out.contains("announce: भाषा हिंदी में बदल दी गई"));

    let out = sim.execute_line("toast").await.unwrap();
    assert!(out.contains("toast [info]: नयन दीप एक्सटेंशन सक्रिय है!"));
}

#[tokio::test]
async fn test_load_fixture() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"url": "https://example.com/", "body": [{{"tag": "button", "attributes": {{"id": "go"}}}}]}}"#
    )
    .unwrap();

    let page = fixture::load_page(file.path()).await.unwrap();

    assert_eq!(page.query_selector_all("#go").len(), 1);
}
